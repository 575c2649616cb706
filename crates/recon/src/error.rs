use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad label, empty vocabulary entry, etc.).
    ConfigValidation(String),
    /// A matcher threshold is outside its allowed range.
    InvalidThreshold { field: &'static str, value: f64 },
    /// Source count is not 2 or 3.
    SourceCount(usize),
    /// Two sources share the same label.
    DuplicateSource(String),
    /// Input names supplied for a label the config does not declare, or missing for one it does.
    UnknownSource(String),
    /// Missing required column in input data.
    MissingColumn { source: String, column: String },
    /// CSV read error.
    Csv(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidThreshold { field, value } => {
                write!(f, "invalid threshold: {field} = {value}")
            }
            Self::SourceCount(n) => write!(f, "2 or 3 sources are required, found {n}"),
            Self::DuplicateSource(label) => write!(f, "duplicate source label: {label}"),
            Self::UnknownSource(label) => write!(f, "unknown source: {label}"),
            Self::MissingColumn { source, column } => {
                write!(f, "source '{source}': missing column '{column}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
