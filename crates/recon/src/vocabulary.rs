use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReconError;

/// Generic legal/business suffixes and filler words dropped before matching.
pub const DEFAULT_IGNORE_WORDS: &[&str] = &[
    "AND", "THE", "OF", "DBA", "INC", "INCORPORATED", "LLC", "LLP", "PLLC", "LTD", "LIMITED",
    "CORP", "CORPORATION", "COMPANY", "GROUP", "HOLDINGS", "ENTERPRISES",
];

/// Place-name tokens that only count when nothing else is left.
pub const DEFAULT_GEO_TERMS: &[&str] = &[
    "NH", "MA", "VT", "ME", "CT", "RI", "NY", "HAMPSHIRE", "VERMONT", "MAINE", "MASSACHUSETTS",
    "BOSTON", "CONCORD", "MANCHESTER", "NASHUA", "PORTSMOUTH", "KEENE", "DOVER", "LACONIA",
];

/// Line-of-business words. Two names that both carry some of these must carry
/// the same ones.
pub const DEFAULT_COMPANY_TYPE_WORDS: &[&str] = &[
    "CONSTRUCTION", "RENTALS", "RENTAL", "STEEL", "TRANSPORTATION", "LOGISTICS", "FREIGHT",
    "TRUCKING", "TOWING", "GARAGE", "WRECKER", "BEVERAGE", "BEVERAGES", "SUPPLY", "SUPPLIES",
    "FORESTRY", "EQUIPMENT", "SOLUTIONS", "SERVICES", "SERVICE",
];

/// Two-letter tokens that still identify a business.
pub const DEFAULT_MEANINGFUL_ABBREVIATIONS: &[&str] = &["CO", "PC", "PA", "LP", "AG", "AC", "RH"];

/// Word lists consumed by the stop-word filter, the tokenizer and the pair
/// matcher. Every word is stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Vocabulary {
    #[serde(deserialize_with = "upper_words")]
    pub ignore_words: BTreeSet<String>,
    #[serde(deserialize_with = "upper_words")]
    pub geo_terms: BTreeSet<String>,
    #[serde(deserialize_with = "upper_words")]
    pub company_type_words: BTreeSet<String>,
    #[serde(deserialize_with = "upper_words")]
    pub meaningful_abbreviations: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            ignore_words: word_set(DEFAULT_IGNORE_WORDS),
            geo_terms: word_set(DEFAULT_GEO_TERMS),
            company_type_words: word_set(DEFAULT_COMPANY_TYPE_WORDS),
            meaningful_abbreviations: word_set(DEFAULT_MEANINGFUL_ABBREVIATIONS),
        }
    }
}

fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_uppercase()).collect()
}

fn upper_words<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let words: Vec<String> = Vec::deserialize(deserializer)?;
    Ok(words.iter().map(|w| w.trim().to_uppercase()).collect())
}

impl Vocabulary {
    /// Empty lists: no stop words, no geo terms, no company types, no
    /// two-letter abbreviations.
    pub fn empty() -> Self {
        Self {
            ignore_words: BTreeSet::new(),
            geo_terms: BTreeSet::new(),
            company_type_words: BTreeSet::new(),
            meaningful_abbreviations: BTreeSet::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let lists = [
            ("ignore_words", &self.ignore_words),
            ("geo_terms", &self.geo_terms),
            ("company_type_words", &self.company_type_words),
            ("meaningful_abbreviations", &self.meaningful_abbreviations),
        ];
        for (list, words) in lists {
            for word in words {
                if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(ReconError::ConfigValidation(format!(
                        "vocabulary.{list}: '{word}' must be a single word of letters and digits"
                    )));
                }
            }
        }
        if let Some(word) = self.meaningful_abbreviations.iter().find(|w| w.len() != 2) {
            return Err(ReconError::ConfigValidation(format!(
                "vocabulary.meaningful_abbreviations: '{word}' must be exactly 2 characters"
            )));
        }
        Ok(())
    }

    /// Drops ignore words, then geo terms unless that would leave nothing.
    /// When the ignore words alone consume the whole name, the input is
    /// returned unchanged.
    pub fn strip_common_words(&self, normalized: &str) -> String {
        let words: Vec<&str> = normalized.split_whitespace().collect();

        let core: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| !self.ignore_words.contains(*w))
            .collect();
        if core.is_empty() {
            return normalized.to_string();
        }

        let content: Vec<&str> = core
            .iter()
            .copied()
            .filter(|w| !self.geo_terms.contains(*w))
            .collect();
        if content.is_empty() {
            core.join(" ")
        } else {
            content.join(" ")
        }
    }

    /// Numbers, words of three or more characters and allow-listed
    /// two-letter abbreviations carry identifying content.
    pub fn is_meaningful(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        if token.chars().any(|c| c.is_ascii_digit()) {
            return true;
        }
        match token.chars().count() {
            1 => false,
            2 => self.meaningful_abbreviations.contains(token),
            _ => true,
        }
    }

    /// Company-type words contained anywhere in `normalized` (substring
    /// match, so `SERVICES` reports both `SERVICE` and `SERVICES`).
    pub fn company_types<'a>(&'a self, normalized: &str) -> BTreeSet<&'a str> {
        let upper = normalized.to_uppercase();
        self.company_type_words
            .iter()
            .filter(|w| upper.contains(w.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_drops_ignore_words() {
        let v = Vocabulary::default();
        assert_eq!(v.strip_common_words("A AND A EXPRESS LLC"), "A A EXPRESS");
        assert_eq!(v.strip_common_words("ACME"), "ACME");
        assert_eq!(v.strip_common_words(""), "");
    }

    #[test]
    fn strip_falls_back_when_everything_is_ignored() {
        let v = Vocabulary::default();
        assert_eq!(v.strip_common_words("THE COMPANY INC"), "THE COMPANY INC");
    }

    #[test]
    fn strip_keeps_geo_only_names() {
        let v = Vocabulary::default();
        assert_eq!(v.strip_common_words("BOSTON"), "BOSTON");
        assert_eq!(v.strip_common_words("BOSTON INC"), "BOSTON");
        assert_eq!(v.strip_common_words("NITCO FORKLIFT CONCORD"), "NITCO FORKLIFT");
    }

    #[test]
    fn meaningful_tokens() {
        let v = Vocabulary::default();
        assert!(v.is_meaningful("1"));
        assert!(v.is_meaningful("A1"));
        assert!(v.is_meaningful("ACE"));
        assert!(v.is_meaningful("CO"));
        assert!(!v.is_meaningful("XY"));
        assert!(!v.is_meaningful("A"));
        assert!(!v.is_meaningful(""));
    }

    #[test]
    fn company_types_use_substring_match() {
        let v = Vocabulary::default();
        let found = v.company_types("ABBOTTS GARAGE AND WRECKER SERVICES");
        assert!(found.contains("GARAGE"));
        assert!(found.contains("SERVICE"));
        assert!(found.contains("SERVICES"));
        assert!(v.company_types("CLEAN HARBORS").is_empty());
    }

    #[test]
    fn alternate_vocabulary() {
        let mut v = Vocabulary::empty();
        v.ignore_words.insert("GMBH".into());
        v.meaningful_abbreviations.insert("XY".into());
        assert_eq!(v.strip_common_words("ACME GMBH"), "ACME");
        assert_eq!(v.strip_common_words("ACME LLC"), "ACME LLC");
        assert!(v.is_meaningful("XY"));
        assert!(!v.is_meaningful("CO"));
    }

    #[test]
    fn validate_rejects_bad_words() {
        let mut v = Vocabulary::default();
        v.ignore_words.insert("TWO WORDS".into());
        assert!(v.validate().is_err());

        let mut v = Vocabulary::default();
        v.meaningful_abbreviations.insert("ABC".into());
        let err = v.validate().unwrap_err();
        assert!(err.to_string().contains("exactly 2"));

        assert!(Vocabulary::default().validate().is_ok());
    }
}
