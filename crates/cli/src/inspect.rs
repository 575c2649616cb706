//! `namerecon match`, `tokens` and `group`: look at the matcher's view of
//! individual names without a full run.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use namerecon::engine::load_csv_names;
use namerecon::normalize::{clean, normalize_for_matching};
use namerecon::{MatcherSettings, NameMatcher, Vocabulary};

use crate::exit_codes::{
    recon_exit_code, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_NO_MATCH, EXIT_RUNTIME,
};
use crate::CliError;

/// The matcher-related tables of a config file. Other tables are ignored so
/// a full reconciliation config can be passed as is.
#[derive(Debug, Default, Deserialize)]
struct MatcherProfile {
    #[serde(default)]
    matcher: MatcherSettings,
    #[serde(default)]
    vocabulary: Vocabulary,
}

fn build_matcher(config: Option<&Path>) -> Result<NameMatcher, CliError> {
    let profile = match config {
        None => MatcherProfile::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::runtime(format!("cannot read config {}: {e}", path.display()))
            })?;
            toml::from_str(&text).map_err(|e| CliError {
                code: EXIT_INVALID_CONFIG,
                message: format!("config parse error: {e}"),
                hint: None,
            })?
        }
    };
    NameMatcher::new(profile.matcher, profile.vocabulary).map_err(|e| CliError {
        code: recon_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// match
// ============================================================================

#[derive(Serialize)]
struct MatchOutput<'a> {
    name1: &'a str,
    name2: &'a str,
    #[serde(rename = "match")]
    is_match: bool,
    #[serde(flatten)]
    explanation: namerecon::MatchExplanation,
}

pub fn cmd_match(
    name1: String,
    name2: String,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let matcher = build_matcher(config.as_deref())?;
    let explanation = matcher.explain(&name1, &name2);
    let is_match = explanation.is_match();

    if json {
        print_json(&MatchOutput {
            name1: &name1,
            name2: &name2,
            is_match,
            explanation,
        })?;
    } else {
        let verdict = if is_match { "match" } else { "no match" };
        println!("{verdict}: {}", explanation.reason);
        for pair in &explanation.pairs {
            println!("  {} ~ {} ({:.2})", pair.left, pair.right, pair.score);
        }
    }

    if is_match {
        Ok(())
    } else {
        Err(CliError { code: EXIT_NO_MATCH, message: String::new(), hint: None })
    }
}

// ============================================================================
// tokens
// ============================================================================

#[derive(Serialize)]
struct TokensOutput {
    name: String,
    cleaned: String,
    normalized: String,
    stripped: String,
    tokens: Vec<String>,
    meaningful: Vec<String>,
    signatures: Vec<String>,
}

pub fn cmd_tokens(name: String, config: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let matcher = build_matcher(config.as_deref())?;
    let vocabulary = matcher.vocabulary();
    let normalized = normalize_for_matching(&name);
    let tokens = matcher.tokens(&name);

    let out = TokensOutput {
        cleaned: clean(&name),
        stripped: vocabulary.strip_common_words(&normalized),
        meaningful: tokens.meaningful(vocabulary).into_iter().map(String::from).collect(),
        tokens: tokens.as_slice().to_vec(),
        signatures: matcher.signatures(&name),
        normalized,
        name,
    };

    if json {
        return print_json(&out);
    }

    println!("cleaned:     {}", out.cleaned);
    println!("normalized:  {}", out.normalized);
    println!("stripped:    {}", out.stripped);
    println!("tokens:      {}", out.tokens.join(" | "));
    println!("meaningful:  {}", out.meaningful.join(" | "));
    println!("signatures:  {}", out.signatures.join(" | "));
    Ok(())
}

// ============================================================================
// group
// ============================================================================

pub fn cmd_group(
    file: PathBuf,
    column: String,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    if column.trim().is_empty() {
        return Err(CliError::args("--column must not be empty"));
    }
    let matcher = build_matcher(config.as_deref())?;
    let csv_data = std::fs::read_to_string(&file)
        .map_err(|e| CliError::runtime(format!("cannot read {}: {e}", file.display())))?;
    let label = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let names = load_csv_names(&label, &csv_data, &column).map_err(|e| CliError {
        code: EXIT_RUNTIME,
        message: e.to_string(),
        hint: None,
    })?;

    let groups = matcher.group_within_source(names.as_slice());

    if json {
        print_json(&groups)?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for group in &groups {
            writeln!(handle, "{} ({})", group.key, group.members.len())
                .map_err(|e| CliError::runtime(e.to_string()))?;
            for member in group.members.iter().skip(1) {
                writeln!(handle, "    {member}").map_err(|e| CliError::runtime(e.to_string()))?;
            }
        }
    }
    eprintln!("{} names in {} groups", names.len(), groups.len());
    Ok(())
}
