//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (`match`: the names match)                   |
//! | 1    | General error; `match`: the names do not match       |
//! | 2    | CLI usage error (bad args)                           |
//! | 3    | Invalid config (TOML, thresholds, sources)           |
//! | 4    | Runtime error (unreadable input, missing column, IO) |

use namerecon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// `match` compared two names that do not match.
/// Like `diff(1)`, exit 1 means "different".
pub const EXIT_NO_MATCH: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input could not be read or output could not be written.
pub const EXIT_RUNTIME: u8 = 4;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidThreshold { .. }
        | ReconError::SourceCount(_)
        | ReconError::DuplicateSource(_) => EXIT_INVALID_CONFIG,
        ReconError::UnknownSource(_) | ReconError::MissingColumn { .. } | ReconError::Csv(_) => {
            EXIT_RUNTIME
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_map_to_invalid_config() {
        assert_eq!(recon_exit_code(&ReconError::SourceCount(1)), EXIT_INVALID_CONFIG);
        assert_eq!(
            recon_exit_code(&ReconError::InvalidThreshold {
                field: "min_match_ratio",
                value: 2.0
            }),
            EXIT_INVALID_CONFIG
        );
    }

    #[test]
    fn input_errors_map_to_runtime() {
        let err = ReconError::MissingColumn {
            source: "tb".into(),
            column: "account_name".into(),
        };
        assert_eq!(recon_exit_code(&err), EXIT_RUNTIME);
        assert_eq!(recon_exit_code(&ReconError::Csv("bad".into())), EXIT_RUNTIME);
    }
}
