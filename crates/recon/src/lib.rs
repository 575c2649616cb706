//! `namerecon`: fuzzy customer-name grouping and cross-source reconciliation.
//!
//! Pure engine crate: receives pre-loaded name lists, returns groups, match
//! pairs and reconciled rows. No CLI or file IO.

pub mod config;
pub mod cross;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod group;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod representative;
pub mod signature;
pub mod similarity;
pub mod tokenize;
pub mod vocabulary;

pub use config::ReconConfig;
pub use cross::{CrossMatch, CrossMatchOutput};
pub use engine::{load_csv_names, run};
pub use error::ReconError;
pub use group::{Group, SourceGroups};
pub use matcher::{MatchExplanation, MatchReason, MatcherSettings, NameMatcher};
pub use model::{ReconInput, ReconResult, ReconRow, ReconSummary};
pub use normalize::{clean, normalize_for_matching};
pub use representative::{best_representative, standardize};
pub use tokenize::{tokenize, TokenSet};
pub use vocabulary::Vocabulary;
