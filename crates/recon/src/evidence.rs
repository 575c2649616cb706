use std::collections::BTreeMap;

use crate::model::{ReconRow, ReconSummary};

/// Count rows by how many sources they cover.
pub fn compute_summary(
    rows: &[ReconRow],
    names_per_source: BTreeMap<String, usize>,
    groups_per_source: BTreeMap<String, usize>,
) -> ReconSummary {
    let mut in_all_sources = 0;
    let mut in_some_sources = 0;
    let mut in_one_source = 0;

    for row in rows {
        match row.source_count() {
            n if n == row.members.len() && n > 1 => in_all_sources += 1,
            0 | 1 => in_one_source += 1,
            _ => in_some_sources += 1,
        }
    }

    ReconSummary {
        total_rows: rows.len(),
        in_all_sources,
        in_some_sources,
        in_one_source,
        names_per_source,
        groups_per_source,
    }
}
