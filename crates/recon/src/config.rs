use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::matcher::{MatcherSettings, NameMatcher};
use crate::vocabulary::Vocabulary;

pub const DEFAULT_OUTPUT_FILE: &str = "customer_reconciliation.csv";
pub const DEFAULT_MAX_ROWS_PER_FILE: usize = 10_000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub name: String,
    #[serde(default)]
    pub matcher: MatcherSettings,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// One input list of customer names. Sources are matched in declaration
/// order: the first against the second, then leftovers against the third.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Short name, used for the `<label>_names` output column.
    pub label: String,
    /// CSV file, relative to the config file.
    pub file: String,
    /// Header of the column holding the names.
    pub column: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub file: String,
    /// Above this many rows the CSV is written as numbered parts.
    pub max_rows_per_file: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_OUTPUT_FILE.to_string(),
            max_rows_per_file: DEFAULT_MAX_ROWS_PER_FILE,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        let n = self.sources.len();
        if !(2..=3).contains(&n) {
            return Err(ReconError::SourceCount(n));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.label.is_empty()
                || !source
                    .label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ReconError::ConfigValidation(format!(
                    "source label '{}' must be non-empty letters, digits, '_' or '-'",
                    source.label
                )));
            }
            if !seen.insert(source.label.as_str()) {
                return Err(ReconError::DuplicateSource(source.label.clone()));
            }
            if source.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': file must not be empty",
                    source.label
                )));
            }
            if source.column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': column must not be empty",
                    source.label
                )));
            }
        }

        if self.output.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.file must not be empty".into(),
            ));
        }
        if self.output.max_rows_per_file == 0 {
            return Err(ReconError::ConfigValidation(
                "output.max_rows_per_file must be at least 1".into(),
            ));
        }

        self.matcher.validate()?;
        self.vocabulary.validate()?;
        Ok(())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn name_matcher(&self) -> Result<NameMatcher, ReconError> {
        NameMatcher::new(self.matcher.clone(), self.vocabulary.clone())
    }
}
