//! Test-case data model and reconciliation result

pub mod test_case;

pub use test_case::{ProjectTrack, Step, SyncStatus, TestCase, TestCaseError};

use serde::{Deserialize, Serialize};

/// Outcome of comparing executed identifiers against catalogued ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub only_in_executed: Vec<String>,
    pub only_in_catalogued: Vec<String>,
    pub near_match_executed: Vec<String>,
    pub near_match_catalogued: Vec<String>,
    /// Present only when the caller asked for it
    pub intersection: Option<Vec<String>>,
}

impl ReconciliationResult {
    /// True when no bucket (including a requested intersection) has entries
    pub fn is_empty(&self) -> bool {
        self.only_in_executed.is_empty()
            && self.only_in_catalogued.is_empty()
            && self.near_match_executed.is_empty()
            && self.near_match_catalogued.is_empty()
            && self.intersection.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn has_differences(&self) -> bool {
        !(self.only_in_executed.is_empty()
            && self.only_in_catalogued.is_empty()
            && self.near_match_executed.is_empty()
            && self.near_match_catalogued.is_empty())
    }
}
