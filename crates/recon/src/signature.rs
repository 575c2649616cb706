use std::collections::{HashMap, HashSet};

use crate::tokenize::tokenize;
use crate::vocabulary::Vocabulary;

/// Lookup keys for candidate pruning: the sorted meaningful tokens, plus
/// drop-one-token subsets for names with more than two meaningful tokens
/// (positions 0 and 1 only, or every position above three tokens).
pub fn signatures(name: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let tokens = tokenize(name, vocabulary);
    let mut meaningful = tokens.meaningful(vocabulary);
    if meaningful.is_empty() {
        meaningful = tokens.iter().collect();
    }
    if meaningful.is_empty() {
        return Vec::new();
    }

    let mut sigs = vec![sorted_join(&meaningful)];

    let n = meaningful.len();
    if n > 2 {
        let drop_positions = if n > 3 { n } else { 2 };
        for skip in 0..drop_positions {
            let subset: Vec<&str> = meaningful
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, t)| *t)
                .collect();
            sigs.push(sorted_join(&subset));
        }
    }

    let mut seen = HashSet::new();
    sigs.retain(|s| !s.is_empty() && seen.insert(s.clone()));
    sigs
}

fn sorted_join(tokens: &[&str]) -> String {
    let mut sorted = tokens.to_vec();
    sorted.sort_unstable();
    sorted.join(" ")
}

/// Signature -> positions of the groups indexed under it, in indexing order.
/// Used only to pick candidates; a shared signature never decides a match.
#[derive(Debug, Default)]
pub struct SignatureIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl SignatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signature: &str, position: usize) {
        let slot = self.entries.entry(signature.to_string()).or_default();
        if !slot.contains(&position) {
            slot.push(position);
        }
    }

    pub fn insert_all(&mut self, signatures: &[String], position: usize) {
        for sig in signatures {
            self.insert(sig, position);
        }
    }

    /// Union of positions under `signatures`, ordered by signature then by
    /// indexing order, without repeats.
    pub fn candidates(&self, signatures: &[String]) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for sig in signatures {
            if let Some(positions) = self.entries.get(sig) {
                for &pos in positions {
                    if seen.insert(pos) {
                        out.push(pos);
                    }
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
