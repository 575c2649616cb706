use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::normalize::{clean, normalize_for_matching};
use crate::signature::signatures;
use crate::similarity::{token_similarity, PLURAL_SCORE};
use crate::tokenize::{is_numeric, tokenize, TokenSet};
use crate::vocabulary::Vocabulary;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables of the pair matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherSettings {
    /// Minimum token score for two tokens to count as aligned.
    pub min_token_similarity: f64,
    /// Minimum share of each side's meaningful tokens that must align.
    pub min_match_ratio: f64,
    /// Minimum number of aligned meaningful token pairs.
    pub min_meaningful_matches: usize,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            min_token_similarity: 0.95,
            min_match_ratio: 0.8,
            min_meaningful_matches: 2,
        }
    }
}

impl MatcherSettings {
    pub fn validate(&self) -> Result<(), ReconError> {
        let sim = self.min_token_similarity;
        if !sim.is_finite() || sim <= 0.0 || sim > 1.0 {
            return Err(ReconError::InvalidThreshold {
                field: "min_token_similarity",
                value: sim,
            });
        }
        let ratio = self.min_match_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(ReconError::InvalidThreshold {
                field: "min_match_ratio",
                value: ratio,
            });
        }
        if self.min_meaningful_matches == 0 {
            return Err(ReconError::InvalidThreshold {
                field: "min_meaningful_matches",
                value: 0.0,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// The rule that decided a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    CleanedEqual,
    NormalizedEqual,
    StrippedEqual,
    EmptyAfterStripping,
    NoTokens,
    CompanyTypeConflict,
    LoneNumberEqual,
    LoneNumberMismatch,
    CashCodConflict,
    SingleTokenMatch,
    InsufficientMeaningful,
    LowMatchRatio,
    NumericMismatch,
    UnexplainedNumber,
    TokensAligned,
}

impl MatchReason {
    pub fn is_match(self) -> bool {
        matches!(
            self,
            Self::CleanedEqual
                | Self::NormalizedEqual
                | Self::StrippedEqual
                | Self::LoneNumberEqual
                | Self::SingleTokenMatch
                | Self::TokensAligned
        )
    }
}

impl std::fmt::Display for MatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::CleanedEqual => "cleaned names are equal",
            Self::NormalizedEqual => "normalized names are equal",
            Self::StrippedEqual => "names are equal without common words",
            Self::EmptyAfterStripping => "nothing left to compare",
            Self::NoTokens => "a name has no tokens",
            Self::CompanyTypeConflict => "different company types",
            Self::LoneNumberEqual => "same lone number",
            Self::LoneNumberMismatch => "lone numbers differ",
            Self::CashCodConflict => "cash customer vs COD customer",
            Self::SingleTokenMatch => "single meaningful tokens match",
            Self::InsufficientMeaningful => "too few meaningful tokens align",
            Self::LowMatchRatio => "meaningful token ratio too low",
            Self::NumericMismatch => "numbers differ",
            Self::UnexplainedNumber => "number on one side only",
            Self::TokensAligned => "meaningful tokens align",
        };
        f.write_str(text)
    }
}

/// One aligned token pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenPair {
    pub left: String,
    pub right: String,
    pub score: f64,
}

/// Outcome of [`NameMatcher::explain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchExplanation {
    pub reason: MatchReason,
    /// Aligned pairs, reported from the first name's side. Empty when the
    /// decision was made before alignment.
    pub pairs: Vec<TokenPair>,
    pub matched_meaningful: usize,
}

impl MatchExplanation {
    fn early(reason: MatchReason) -> Self {
        Self {
            reason,
            pairs: Vec::new(),
            matched_meaningful: 0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.reason.is_match()
    }
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Decides whether two raw customer names denote the same entity.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    settings: MatcherSettings,
    vocabulary: Vocabulary,
}

impl NameMatcher {
    pub fn new(settings: MatcherSettings, vocabulary: Vocabulary) -> Result<Self, ReconError> {
        settings.validate()?;
        vocabulary.validate()?;
        Ok(Self {
            settings,
            vocabulary,
        })
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tokens(&self, name: &str) -> TokenSet {
        tokenize(name, &self.vocabulary)
    }

    pub fn signatures(&self, name: &str) -> Vec<String> {
        signatures(name, &self.vocabulary)
    }

    pub fn names_match(&self, name1: &str, name2: &str) -> bool {
        self.explain(name1, name2).is_match()
    }

    /// Runs the decision sequence and reports the rule that ended it.
    pub fn explain(&self, name1: &str, name2: &str) -> MatchExplanation {
        use MatchReason::*;

        if clean(name1) == clean(name2) {
            return MatchExplanation::early(CleanedEqual);
        }

        let norm1 = normalize_for_matching(name1);
        let norm2 = normalize_for_matching(name2);
        if norm1 == norm2 {
            return MatchExplanation::early(NormalizedEqual);
        }

        let stripped1 = self.vocabulary.strip_common_words(&norm1);
        let stripped2 = self.vocabulary.strip_common_words(&norm2);
        if stripped1.is_empty() && stripped2.is_empty() {
            return MatchExplanation::early(EmptyAfterStripping);
        }
        if stripped1 == stripped2 {
            return MatchExplanation::early(StrippedEqual);
        }

        let tokens1 = self.tokens(name1);
        let tokens2 = self.tokens(name2);
        if tokens1.is_empty() || tokens2.is_empty() {
            return MatchExplanation::early(NoTokens);
        }

        let meaningful1 = tokens1.meaningful(&self.vocabulary);
        let meaningful2 = tokens2.meaningful(&self.vocabulary);

        let types1 = self.vocabulary.company_types(&norm1);
        let types2 = self.vocabulary.company_types(&norm2);
        if !types1.is_empty() && !types2.is_empty() && types1 != types2 {
            return MatchExplanation::early(CompanyTypeConflict);
        }

        if let ([only1], [only2]) = (meaningful1.as_slice(), meaningful2.as_slice()) {
            if is_numeric(only1) || is_numeric(only2) {
                return MatchExplanation::early(if only1 == only2 {
                    LoneNumberEqual
                } else {
                    LoneNumberMismatch
                });
            }
        }

        if cash_cod_conflict(name1, name2) {
            return MatchExplanation::early(CashCodConflict);
        }

        let pairs = self.align(&tokens1, &tokens2);
        let matched_meaningful = pairs
            .iter()
            .filter(|p| {
                self.vocabulary.is_meaningful(&p.left) && self.vocabulary.is_meaningful(&p.right)
            })
            .count();
        let decided = |reason| MatchExplanation {
            reason,
            pairs: pairs.clone(),
            matched_meaningful,
        };

        if matched_meaningful < self.settings.min_meaningful_matches {
            let single = meaningful1.len() == 1
                && meaningful2.len() == 1
                && matched_meaningful == 1
                && pairs.iter().any(|p| {
                    p.left == meaningful1[0] && p.right == meaningful2[0] && p.score >= PLURAL_SCORE
                });
            return decided(if single {
                SingleTokenMatch
            } else {
                InsufficientMeaningful
            });
        }

        if !meaningful1.is_empty() && !meaningful2.is_empty() {
            let ratio1 = matched_meaningful as f64 / meaningful1.len() as f64;
            let ratio2 = matched_meaningful as f64 / meaningful2.len() as f64;
            if ratio1.min(ratio2) < self.settings.min_match_ratio {
                return decided(LowMatchRatio);
            }
        }

        let mut nums1 = tokens1.numeric();
        let mut nums2 = tokens2.numeric();
        nums1.sort_unstable();
        nums2.sort_unstable();
        match (nums1.is_empty(), nums2.is_empty()) {
            (false, false) if nums1 != nums2 => return decided(NumericMismatch),
            (false, true) | (true, false) if matched_meaningful < 3 => {
                return decided(UnexplainedNumber)
            }
            _ => {}
        }

        decided(TokensAligned)
    }

    /// Greedy alignment: each token of the driving side takes the
    /// best-scoring unused token of the other side (earliest on ties) when the
    /// score reaches `min_token_similarity`. The side with fewer tokens drives,
    /// then the lexicographically smaller sequence, so the result does not
    /// depend on argument order. Pairs are reported as (tokens1, tokens2).
    fn align(&self, tokens1: &TokenSet, tokens2: &TokenSet) -> Vec<TokenPair> {
        let swapped = (tokens2.len(), tokens2.as_slice()) < (tokens1.len(), tokens1.as_slice());
        let (driver, other) = if swapped {
            (tokens2, tokens1)
        } else {
            (tokens1, tokens2)
        };

        let mut used = vec![false; other.len()];
        let mut pairs = Vec::new();
        for t1 in driver.iter() {
            let mut best: Option<(usize, f64)> = None;
            for (idx, t2) in other.iter().enumerate() {
                if used[idx] {
                    continue;
                }
                let score = token_similarity(t1, t2);
                if score > 0.0 && best.map_or(true, |(_, b)| score > b) {
                    best = Some((idx, score));
                }
            }
            if let Some((idx, score)) = best {
                if score >= self.settings.min_token_similarity {
                    used[idx] = true;
                    let t2 = other.as_slice()[idx].clone();
                    let (left, right) = if swapped {
                        (t2, t1.to_string())
                    } else {
                        (t1.to_string(), t2)
                    };
                    pairs.push(TokenPair { left, right, score });
                }
            }
        }
        pairs
    }
}

/// A `*cash` walk-in account never matches a COD account. Checked on the raw
/// text because normalization drops the `*` marker.
fn cash_cod_conflict(name1: &str, name2: &str) -> bool {
    let lower1 = name1.to_lowercase();
    let lower2 = name2.to_lowercase();
    let conflict = |cash: &str, cod: &str| {
        cash.contains("*cash") && cod.contains("cod") && !cash.contains("*cod")
    };
    conflict(&lower1, &lower2) || conflict(&lower2, &lower1)
}
