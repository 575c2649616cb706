use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded raw names keyed by source label, each list in file order.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub names: HashMap<String, Vec<String>>,
}

impl ReconInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, label: &str, names: Vec<String>) -> Self {
        self.names.insert(label.to_string(), names);
        self
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One real-world customer: a display name plus the member names each
/// source contributed. `members` follows the configured source order and
/// holds `None` for sources with no group in this row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconRow {
    pub standardized_name: String,
    pub members: Vec<Option<Vec<String>>>,
}

impl ReconRow {
    pub fn source_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_some()).count()
    }

    /// All member names in source order.
    pub fn all_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .flatten()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    /// Rows with a group from every source.
    pub in_all_sources: usize,
    /// Rows with groups from more than one source but not all of them.
    pub in_some_sources: usize,
    pub in_one_source: usize,
    pub names_per_source: BTreeMap<String, usize>,
    pub groups_per_source: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<ReconRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub sources: Vec<String>,
    pub engine_version: String,
    pub run_at: String,
}
