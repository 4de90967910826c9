//! Documentation grammar: sections, tables, steps and escaping
//!
//! The readers operate on a [`LineCursor`](crate::cursor::LineCursor) and
//! fail with a [`GrammarError`] on the first violation.

pub mod error;
pub mod escape;
pub mod section;
pub mod steps;
pub mod table;

pub use error::{GrammarError, GrammarResult};
pub use escape::escape_markup;
pub use section::{expect_header, read_section, Section};
pub use steps::{read_step_element, StepElement, StepRead};
pub use table::{read_table, render_table};
