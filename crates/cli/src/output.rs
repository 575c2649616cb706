//! Reconciliation CSV output, split into numbered parts when large.

use std::path::{Path, PathBuf};

use namerecon::ReconRow;

use crate::exit_codes::EXIT_RUNTIME;
use crate::CliError;

/// Separator between member names inside one cell.
const MEMBER_SEPARATOR: &str = "; ";

/// Writes `rows` to `base`, or to `<stem>_part_<i>_of_<n>.csv` files next to
/// it when there are more than `max_rows` rows. Returns the written paths.
pub fn write_rows(
    base: &Path,
    labels: &[String],
    rows: &[ReconRow],
    max_rows: usize,
) -> Result<Vec<PathBuf>, CliError> {
    let max_rows = max_rows.max(1);
    if let Some(dir) = base.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| {
            CliError::runtime(format!("cannot create {}: {e}", dir.display()))
        })?;
    }

    if rows.len() <= max_rows {
        write_csv(base, labels, rows)?;
        return Ok(vec![base.to_path_buf()]);
    }

    let chunks: Vec<&[ReconRow]> = rows.chunks(max_rows).collect();
    let total = chunks.len();
    let mut written = Vec::with_capacity(total);
    for (i, chunk) in chunks.into_iter().enumerate() {
        let path = part_path(base, i + 1, total);
        write_csv(&path, labels, chunk)?;
        log::info!("wrote {} rows to {}", chunk.len(), path.display());
        written.push(path);
    }
    Ok(written)
}

fn part_path(base: &Path, part: usize, total: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "customer_reconciliation".to_string());
    base.with_file_name(format!("{stem}_part_{part}_of_{total}.csv"))
}

fn write_csv(path: &Path, labels: &[String], rows: &[ReconRow]) -> Result<(), CliError> {
    let io_err = |e: csv::Error| CliError::runtime(format!("cannot write {}: {e}", path.display()));

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)
        .map_err(io_err)?;

    let mut header = vec!["standardized_name".to_string()];
    header.extend(labels.iter().map(|l| format!("{l}_names")));
    writer.write_record(&header).map_err(io_err)?;

    for row in rows {
        let mut record = Vec::with_capacity(labels.len() + 1);
        record.push(row.standardized_name.clone());
        for members in &row.members {
            record.push(
                members
                    .as_ref()
                    .map(|names| names.join(MEMBER_SEPARATOR))
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record).map_err(io_err)?;
    }

    writer
        .flush()
        .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", path.display())))
}
