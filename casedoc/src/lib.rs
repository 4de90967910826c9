//! Test-case documentation extraction and identifier reconciliation
//!
//! Reads structured test documentation out of annotated-function,
//! keyword-table and feature-scenario test sources, assembles it into
//! [`TestCase`] records, writes assigned identifiers back into the sources,
//! and reconciles executed identifiers against a catalogue.

#[macro_use]
pub mod logging;

pub mod assembler;
pub mod backend;
pub mod batch;
pub mod config;
pub mod cursor;
pub mod dialect;
pub mod file_processor;
pub mod grammar;
pub mod model;
pub mod pipeline;
pub mod reconcile;

// Re-export key types for library consumers
pub use assembler::{parse_documentation_block, AssemblyWarning, ParsedCases, SyncMode};
pub use backend::{push_results, BackendError, CatalogBackend, ExecutionResult};
pub use batch::{BatchConfig, BatchError, BatchProcessor, BatchResults};
pub use config::SyncConfig;
pub use dialect::{Dialect, RenameError, RenameMap};
pub use grammar::{GrammarError, GrammarResult};
pub use model::{ReconciliationResult, TestCase};
pub use pipeline::{Pipeline, PipelineError, PipelineResult};
pub use reconcile::{reconcile, render_report, write_report, Reconciler};
