//! `namerecon run` / `namerecon validate`: config-driven reconciliation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use namerecon::engine::load_csv_names;
use namerecon::{ReconConfig, ReconInput};

use crate::exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_RUNTIME};
use crate::output::write_rows;
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn engine_err(err: namerecon::ReconError) -> CliError {
    recon_err(recon_exit_code(&err), err.to_string())
}

/// Reads and validates a config file.
pub fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        recon_err(EXIT_RUNTIME, format!("cannot read config {}: {e}", config_path.display()))
    })?;
    ReconConfig::from_toml(&config_str).map_err(|e| {
        recon_err(EXIT_INVALID_CONFIG, e.to_string())
            .with_hint("see `namerecon run --help` for the config layout")
    })
}

/// Source and output paths are relative to the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
    no_csv: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    let mut names: HashMap<String, Vec<String>> = HashMap::new();
    for source in &config.sources {
        let csv_path = base_dir.join(&source.file);
        let csv_data = std::fs::read_to_string(&csv_path).map_err(|e| {
            recon_err(EXIT_RUNTIME, format!("cannot read {}: {e}", csv_path.display()))
        })?;
        let loaded = load_csv_names(&source.label, &csv_data, &source.column).map_err(engine_err)?;
        log::info!("source '{}': {} names from {}", source.label, loaded.len(), csv_path.display());
        names.insert(source.label.clone(), loaded);
    }

    let result = namerecon::run(&config, &ReconInput { names }).map_err(engine_err)?;

    let written = if no_csv {
        Vec::new()
    } else {
        let csv_path = csv_file.unwrap_or_else(|| base_dir.join(&config.output.file));
        write_rows(
            &csv_path,
            &result.meta.sources,
            &result.rows,
            config.output.max_rows_per_file,
        )?
    };

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{}: {} customers from {} sources. {} in all, {} in some, {} in one",
        result.meta.config_name,
        s.total_rows,
        result.meta.sources.len(),
        s.in_all_sources,
        s.in_some_sources,
        s.in_one_source,
    );
    for path in &written {
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let base_dir = base_dir(&config_path);

    for source in &config.sources {
        let csv_path = base_dir.join(&source.file);
        if !csv_path.is_file() {
            log::warn!("source '{}': {} does not exist yet", source.label, csv_path.display());
        }
    }

    eprintln!(
        "{}: ok ({} sources: {})",
        config.name,
        config.sources.len(),
        config.labels().join(", ")
    );
    Ok(())
}
