use std::collections::{BTreeMap, HashSet};

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::group::{Group, SourceGroups};
use crate::matcher::NameMatcher;
use crate::model::{ReconInput, ReconMeta, ReconResult, ReconRow};
use crate::representative::{best_representative, standardize};

/// Run reconciliation per config. Returns one row per customer + summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    config.validate()?;
    let matcher = config.name_matcher()?;
    let labels = config.labels();

    if let Some(extra) = input
        .names
        .keys()
        .find(|k| !labels.contains(&k.as_str()))
    {
        return Err(ReconError::UnknownSource(extra.clone()));
    }

    let mut names_per_source = BTreeMap::new();
    let mut groups_per_source = BTreeMap::new();
    let mut sources: Vec<SourceGroups> = Vec::with_capacity(labels.len());
    for label in &labels {
        let names = input
            .names
            .get(*label)
            .ok_or_else(|| ReconError::UnknownSource(label.to_string()))?;
        log::info!("source '{label}': grouping {} names", names.len());
        let groups = matcher.group_within_source(names.as_slice());
        names_per_source.insert(label.to_string(), groups.iter().map(|g| g.members.len()).sum());
        groups_per_source.insert(label.to_string(), groups.len());
        sources.push(groups);
    }

    let mut rows = reconcile(&matcher, &sources);
    rows.sort_by(|a, b| a.standardized_name.cmp(&b.standardized_name));

    let summary = compute_summary(&rows, names_per_source, groups_per_source);
    log::info!(
        "{} customers: {} in all sources, {} in some, {} in one",
        summary.total_rows,
        summary.in_all_sources,
        summary.in_some_sources,
        summary.in_one_source
    );

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            sources: labels.iter().map(|l| l.to_string()).collect(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        rows,
    })
}

/// Consumed group keys, one set per source.
struct Consumed(Vec<HashSet<String>>);

impl Consumed {
    fn new(sources: usize) -> Self {
        Self(vec![HashSet::new(); sources])
    }

    fn mark(&mut self, source: usize, group: &Group) {
        self.0[source].insert(group.key.clone());
    }

    fn contains(&self, source: usize, group: &Group) -> bool {
        self.0[source].contains(&group.key)
    }
}

/// First source against the second; with a third source, each row tries to
/// pick up a third-source group, then leftovers of the second source are
/// matched against leftovers of the third. Every group lands in exactly one
/// row.
fn reconcile(matcher: &NameMatcher, sources: &[SourceGroups]) -> Vec<ReconRow> {
    let width = sources.len();
    let mut consumed = Consumed::new(width);
    let mut rows = Vec::new();

    let first_pass = matcher.match_groups(&sources[0], &sources[1]);
    log::info!(
        "matched {} of {} first-source groups against the second source",
        first_pass.matched_count(),
        first_pass.matches.len()
    );

    let third = sources.get(2);
    let third_reps: Vec<&str> = third
        .map(|groups| groups.iter().map(|g| best_representative(g.members.as_slice())).collect())
        .unwrap_or_default();

    for m in &first_pass.matches {
        let mut members = vec![None; width];
        consumed.mark(0, &m.left);
        members[0] = Some(m.left.members.clone());
        if let Some(right) = &m.right {
            consumed.mark(1, right);
            members[1] = Some(right.members.clone());
        }

        if let Some(third) = third {
            let mut candidates = m.right.iter().chain(std::iter::once(&m.left));
            let attached = candidates.find_map(|cand| {
                let rep = best_representative(cand.members.as_slice());
                third.iter().enumerate().find_map(|(pos, group)| {
                    (!consumed.contains(2, group) && matcher.names_match(rep, third_reps[pos]))
                        .then_some(group)
                })
            });
            if let Some(group) = attached {
                consumed.mark(2, group);
                members[2] = Some(group.members.clone());
            }
        }

        rows.push(row(members));
    }

    if let Some(third) = third {
        let rest_second = sources[1].filtered(|g| !consumed.contains(1, g));
        let rest_third = third.filtered(|g| !consumed.contains(2, g));
        if !rest_second.is_empty() && !rest_third.is_empty() {
            let second_pass = matcher.match_groups(&rest_second, &rest_third);
            log::info!(
                "matched {} leftover second-source groups against the third source",
                second_pass.matched_count()
            );
            for m in &second_pass.matches {
                let mut members = vec![None; width];
                consumed.mark(1, &m.left);
                members[1] = Some(m.left.members.clone());
                if let Some(right) = &m.right {
                    consumed.mark(2, right);
                    members[2] = Some(right.members.clone());
                }
                rows.push(row(members));
            }
        }
    }

    for (source, groups) in sources.iter().enumerate() {
        for group in groups.iter().filter(|g| !consumed.contains(source, g)) {
            let mut members = vec![None; width];
            members[source] = Some(group.members.clone());
            rows.push(row(members));
        }
    }

    rows
}

fn row(members: Vec<Option<Vec<String>>>) -> ReconRow {
    let mut row = ReconRow {
        standardized_name: String::new(),
        members,
    };
    let names = row.all_names();
    let standardized = standardize(best_representative(names.as_slice()));
    row.standardized_name = standardized;
    row
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Extracts the non-blank values of `column` from CSV text, in file order.
pub fn load_csv_names(source: &str, csv_data: &str, column: &str) -> Result<Vec<String>, ReconError> {
    let csv_data = csv_data.strip_prefix('\u{feff}').unwrap_or(csv_data);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ReconError::Csv(format!("{source}: {e}")))?;
    let idx = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| ReconError::MissingColumn {
            source: source.into(),
            column: column.into(),
        })?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(format!("{source}: {e}")))?;
        match record.get(idx) {
            Some(value) if !value.trim().is_empty() => names.push(value.to_string()),
            _ => {}
        }
    }
    log::debug!("source '{source}': loaded {} names from column '{column}'", names.len());
    Ok(names)
}
