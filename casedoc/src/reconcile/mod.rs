//! Identifier reconciliation
//!
//! Compares identifiers seen in an execution against identifiers held by
//! the catalogue. The exact pass is a set difference in first-occurrence
//! order; the optional fuzzy pass moves entries that share a `:`-delimited
//! prefix or suffix with the other side into near-match buckets.

pub mod extract;
pub mod report;

pub use extract::{global_ids_from_executed, ExecutedFramework, ExtractError};
pub use report::{render_report, write_report, ReportError};

use crate::log_success;
use crate::logging::codes;
use crate::model::ReconciliationResult;
use std::collections::HashSet;

/// Reconciler configured once and reused across comparisons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciler {
    fuzzy: bool,
    include_intersection: bool,
}

impl Reconciler {
    pub fn new(fuzzy: bool) -> Self {
        Self {
            fuzzy,
            include_intersection: false,
        }
    }

    pub fn with_intersection(mut self, include: bool) -> Self {
        self.include_intersection = include;
        self
    }

    pub fn reconcile<S: AsRef<str>>(&self, executed: &[S], catalogued: &[S]) -> ReconciliationResult {
        let executed = distinct(executed);
        let catalogued = distinct(catalogued);

        let executed_set: HashSet<&str> = executed.iter().copied().collect();
        let catalogued_set: HashSet<&str> = catalogued.iter().copied().collect();

        let only_executed: Vec<&str> = executed
            .iter()
            .copied()
            .filter(|id| !catalogued_set.contains(id))
            .collect();
        let only_catalogued: Vec<&str> = catalogued
            .iter()
            .copied()
            .filter(|id| !executed_set.contains(id))
            .collect();

        let mut result = if self.fuzzy {
            fuzzy_partition(&only_executed, &only_catalogued)
        } else {
            ReconciliationResult {
                only_in_executed: to_owned(&only_executed),
                only_in_catalogued: to_owned(&only_catalogued),
                ..Default::default()
            }
        };

        if self.include_intersection {
            result.intersection = Some(
                executed
                    .iter()
                    .filter(|id| catalogued_set.contains(*id))
                    .map(|id| id.to_string())
                    .collect(),
            );
        }

        log_success!(codes::success::RECONCILIATION_COMPLETE, "Identifier reconciliation complete",
            "executed" => executed.len(),
            "catalogued" => catalogued.len(),
            "only_in_executed" => result.only_in_executed.len(),
            "only_in_catalogued" => result.only_in_catalogued.len(),
            "near_matches" => result.near_match_executed.len() + result.near_match_catalogued.len()
        );

        result
    }
}

/// Reconcile without an intersection bucket
pub fn reconcile<S: AsRef<str>>(executed: &[S], catalogued: &[S], fuzzy: bool) -> ReconciliationResult {
    Reconciler::new(fuzzy).reconcile(executed, catalogued)
}

fn distinct<S: AsRef<str>>(ids: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect()
}

fn to_owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

/// `prefix:suffix`; an id without a colon is both
fn split_key(id: &str) -> (&str, &str) {
    id.split_once(':').unwrap_or((id, id))
}

/// Prefixes and suffixes of one side's difference list
struct KeySets<'a> {
    prefixes: HashSet<&'a str>,
    suffixes: HashSet<&'a str>,
}

impl<'a> KeySets<'a> {
    fn new(ids: &[&'a str]) -> Self {
        let (prefixes, suffixes) = ids.iter().map(|id| split_key(*id)).unzip();
        Self { prefixes, suffixes }
    }

    fn matches(&self, id: &str) -> bool {
        let (prefix, suffix) = split_key(id);
        self.prefixes.contains(prefix) || self.suffixes.contains(suffix)
    }
}

/// Both sides are classified against the other side's original difference
/// list, so a match never depends on classification order
fn fuzzy_partition(only_executed: &[&str], only_catalogued: &[&str]) -> ReconciliationResult {
    let executed_keys = KeySets::new(only_executed);
    let catalogued_keys = KeySets::new(only_catalogued);

    let (near_match_executed, only_in_executed): (Vec<&str>, Vec<&str>) = only_executed
        .iter()
        .partition(|id| catalogued_keys.matches(id));
    let (near_match_catalogued, only_in_catalogued): (Vec<&str>, Vec<&str>) = only_catalogued
        .iter()
        .partition(|id| executed_keys.matches(id));

    ReconciliationResult {
        only_in_executed: to_owned(&only_in_executed),
        only_in_catalogued: to_owned(&only_in_catalogued),
        near_match_executed: to_owned(&near_match_executed),
        near_match_catalogued: to_owned(&near_match_catalogued),
        intersection: None,
    }
}
