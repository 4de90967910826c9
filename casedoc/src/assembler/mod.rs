//! Test-case assembler
//!
//! Walks a filtered documentation block with a [`LineCursor`], recognizes
//! case headers by the dialect's add/update markers and reads each case
//! through the section, step and projects grammars. The first grammar
//! failure aborts the whole block.

mod projects;

pub use projects::AssemblyWarning;

use crate::config::compile_time::assembly::MAX_STEPS_PER_CASE;
use crate::config::SyncConfig;
use crate::cursor::LineCursor;
use crate::dialect::Dialect;
use crate::grammar::{
    expect_header, read_section, read_step_element, GrammarResult, Section, StepElement,
};
use crate::logging::codes;
use crate::model::{Step, TestCase};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::fmt;

const STEPS_LABEL: &str = "Steps";

/// Which case headers the assembler picks up
///
/// With neither flag set the assembler runs in validation mode and accepts
/// both markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncMode {
    pub want_add: bool,
    pub want_update: bool,
}

impl SyncMode {
    pub fn add_only() -> Self {
        Self {
            want_add: true,
            want_update: false,
        }
    }

    pub fn update_only() -> Self {
        Self {
            want_add: false,
            want_update: true,
        }
    }

    pub fn both() -> Self {
        Self {
            want_add: true,
            want_update: true,
        }
    }

    pub fn validation() -> Self {
        Self::default()
    }

    pub fn is_validation(&self) -> bool {
        !self.want_add && !self.want_update
    }

    fn accepts_add(&self) -> bool {
        self.want_add || self.is_validation()
    }

    fn accepts_update(&self) -> bool {
        self.want_update || self.is_validation()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseKind {
    Add,
    Update,
}

/// Position of the assembler within one case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    Scanning,
    CaseHeaderFound,
    DescriptionRead,
    PrerequisitesRead,
    TestDataRead,
    StepsRead,
    ProjectsRead,
    Emit,
}

impl AssemblyStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssemblyStage::Scanning => "scanning",
            AssemblyStage::CaseHeaderFound => "case_header_found",
            AssemblyStage::DescriptionRead => "description_read",
            AssemblyStage::PrerequisitesRead => "prerequisites_read",
            AssemblyStage::TestDataRead => "test_data_read",
            AssemblyStage::StepsRead => "steps_read",
            AssemblyStage::ProjectsRead => "projects_read",
            AssemblyStage::Emit => "emit",
        }
    }
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cases assembled from one block, partitioned by header marker
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedCases {
    pub added: Vec<TestCase>,
    pub updated: Vec<TestCase>,
    pub warnings: Vec<AssemblyWarning>,
}

impl ParsedCases {
    pub fn case_count(&self) -> usize {
        self.added.len() + self.updated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.case_count() == 0
    }

    /// Fold another file's cases into this set
    pub fn merge(&mut self, other: ParsedCases) {
        self.added.extend(other.added);
        self.updated.extend(other.updated);
        self.warnings.extend(other.warnings);
    }
}

/// Stage tracker for one case; every transition is debug-logged
struct StageTracker<'c> {
    case: &'c str,
    stage: AssemblyStage,
}

impl<'c> StageTracker<'c> {
    fn new(case: &'c str) -> Self {
        Self {
            case,
            stage: AssemblyStage::CaseHeaderFound,
        }
    }

    fn advance(&mut self, next: AssemblyStage) {
        log_debug!("Assembly stage transition",
            "case" => self.case,
            "from" => self.stage,
            "to" => next
        );
        self.stage = next;
    }
}

pub struct Assembler<'a> {
    config: &'a SyncConfig,
    dialect: Dialect,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a SyncConfig, dialect: Dialect) -> Self {
        Self { config, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Assemble every case in `block` whose header `mode` selects
    pub fn assemble(
        &self,
        block: &str,
        parent_folder_path: &str,
        mode: SyncMode,
    ) -> GrammarResult<ParsedCases> {
        let mut cursor = LineCursor::new(block);
        let mut parsed = ParsedCases::default();

        log_debug!("Assembling documentation block",
            "dialect" => self.dialect,
            "lines" => cursor.line_count(),
            "folder" => parent_folder_path
        );

        while let Some(line) = cursor.next_line() {
            let header = line.trim();
            let Some(kind) = self.classify(header, mode) else {
                continue;
            };

            let (case, warning) = self
                .assemble_case(&mut cursor, header, kind, parent_folder_path)
                .inspect_err(|e| {
                    log_error!(e.error_code(), &e.to_string(), line = cursor.line_number(),
                        "case" => e.case_name().unwrap_or(header)
                    );
                })?;

            log_success!(codes::success::CASE_ASSEMBLED, "Test case assembled",
                "case" => case.name(),
                "global_id" => case.global_id(),
                "steps" => case.steps().len()
            );

            parsed.warnings.extend(warning);
            match kind {
                CaseKind::Add => parsed.added.push(case),
                CaseKind::Update => parsed.updated.push(case),
            }
        }

        log_success!(codes::success::BLOCK_ASSEMBLED, "Documentation block assembled",
            "added" => parsed.added.len(),
            "updated" => parsed.updated.len(),
            "warnings" => parsed.warnings.len()
        );

        Ok(parsed)
    }

    fn classify(&self, header: &str, mode: SyncMode) -> Option<CaseKind> {
        if mode.accepts_add() && header.starts_with(self.dialect.add_start_marker()) {
            Some(CaseKind::Add)
        } else if mode.accepts_update() && header.starts_with(self.dialect.update_start_marker()) {
            Some(CaseKind::Update)
        } else {
            None
        }
    }

    fn assemble_case(
        &self,
        cursor: &mut LineCursor<'_>,
        header: &str,
        kind: CaseKind,
        parent_folder_path: &str,
    ) -> GrammarResult<(TestCase, Option<AssemblyWarning>)> {
        let name = self.dialect.case_name_from_header(header);
        let global_id = match kind {
            CaseKind::Update => self.dialect.derive_global_id(name),
            CaseKind::Add => self.dialect.placeholder().to_string(),
        };

        let mut stages = StageTracker::new(name);
        let mut case = TestCase::new(name, &global_id, parent_folder_path);

        self.dialect.expect_documentation_start(cursor, header, name)?;

        case.set_description(read_section(cursor, Section::Description, name)?);
        stages.advance(AssemblyStage::DescriptionRead);

        case.set_prerequisites(read_section(cursor, Section::Prerequisites, name)?);
        stages.advance(AssemblyStage::PrerequisitesRead);

        case.set_test_data(read_section(cursor, Section::TestData, name)?);
        stages.advance(AssemblyStage::TestDataRead);

        for step in read_steps(cursor, name)? {
            case.add_step(step);
        }
        stages.advance(AssemblyStage::StepsRead);

        let warning = projects::read_projects(cursor, &mut case, self.config, self.dialect)?;
        stages.advance(AssemblyStage::ProjectsRead);

        stages.advance(AssemblyStage::Emit);
        stages.advance(AssemblyStage::Scanning);

        Ok((case, warning))
    }
}

/// `Steps:` header then (step, ER, Notes) triads up to a blank line
///
/// At least one triad is read; an empty list fails on step numbering.
/// Passing `MAX_STEPS_PER_CASE` only logs a warning.
fn read_steps(cursor: &mut LineCursor<'_>, case: &str) -> GrammarResult<Vec<Step>> {
    expect_header(cursor, STEPS_LABEL, case, false)?;

    let mut steps = Vec::new();
    let mut count = 1;
    let mut line = cursor.next_line_or_blank().trim();

    loop {
        let step = read_step_element(cursor, StepElement::Step, count, line, case)?;
        let expected = read_step_element(
            cursor,
            StepElement::ExpectedResult,
            step.count,
            step.next_line,
            case,
        )?;
        let notes =
            read_step_element(cursor, StepElement::Notes, expected.count, expected.next_line, case)?;

        steps.push(Step::new(step.text, expected.text, notes.text));
        if steps.len() == MAX_STEPS_PER_CASE + 1 {
            crate::log_warning!(code = codes::warnings::MANY_STEPS,
                "Test case has more steps than the configured limit",
                "case" => case,
                "limit" => MAX_STEPS_PER_CASE
            );
        }

        count = notes.count;
        line = notes.next_line;
        if line.is_empty() {
            break;
        }
    }

    Ok(steps)
}

/// Parse a filtered documentation block in one call
pub fn parse_documentation_block(
    text: &str,
    dialect: Dialect,
    mode: SyncMode,
    config: &SyncConfig,
    parent_folder_path: &str,
) -> GrammarResult<ParsedCases> {
    Assembler::new(config, dialect).assemble(text, parent_folder_path, mode)
}
