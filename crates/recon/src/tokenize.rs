use serde::Serialize;

use crate::normalize::normalize_for_matching;
use crate::vocabulary::Vocabulary;

/// Deduplicated tokens of one name, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for word in words {
            if !tokens.iter().any(|t| t == word) {
                tokens.push(word.to_string());
            }
        }
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn meaningful<'a>(&'a self, vocabulary: &Vocabulary) -> Vec<&'a str> {
        self.iter().filter(|t| vocabulary.is_meaningful(t)).collect()
    }

    /// Tokens made only of digits.
    pub fn numeric(&self) -> Vec<&str> {
        self.iter().filter(|t| is_numeric(t)).collect()
    }
}

pub fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Normalize, drop stop words, split. Tokens that are not plain
/// letters/digits are discarded.
pub fn tokenize(name: &str, vocabulary: &Vocabulary) -> TokenSet {
    let normalized = normalize_for_matching(name);
    let stripped = vocabulary.strip_common_words(&normalized);
    let source = if stripped.is_empty() { normalized.as_str() } else { stripped.as_str() };

    TokenSet::from_words(
        source
            .split_whitespace()
            .filter(|t| t.chars().all(|c| c.is_ascii_alphanumeric())),
    )
}
