//! Conservative token similarity: exact match, plural suffixes, and
//! single-typo detection on longer words. Not an edit distance.

use crate::tokenize::is_numeric;

/// Score given to plural pairs such as `ARROW`/`ARROWS` and `MARSH`/`MARSHES`.
pub const PLURAL_SCORE: f64 = 0.95;

/// Minimum in-order character ratio for a typo match.
pub const NEAR_MATCH_RATIO: f64 = 0.85;

/// Similarity of two tokens in `[0, 1]`.
pub fn token_similarity(t1: &str, t2: &str) -> f64 {
    if t1 == t2 {
        return 1.0;
    }

    // Distinct numbers never match, and numbers never match words.
    if is_numeric(t1) || is_numeric(t2) {
        return 0.0;
    }

    let a: Vec<char> = t1.chars().collect();
    let b: Vec<char> = t2.chars().collect();

    if a.len() > 3 && b.len() > 3 && is_plural_of(t1, t2) {
        return PLURAL_SCORE;
    }

    if a.len() <= 3 || b.len() <= 3 {
        return 0.0;
    }

    if a.len() > 4 && b.len() > 4 && a.len().abs_diff(b.len()) <= 1 {
        let ratio = aligned_matches(&a, &b) as f64 / a.len().max(b.len()) as f64;
        if ratio >= NEAR_MATCH_RATIO {
            return ratio;
        }
    }

    0.0
}

fn is_plural_of(t1: &str, t2: &str) -> bool {
    let plural = |base: &str, other: &str| {
        other.strip_prefix(base).is_some_and(|rest| rest == "S" || rest == "ES")
    };
    plural(t1, t2) || plural(t2, t1)
}

/// Greedy in-order alignment. On a mismatch the pointer with more characters
/// left advances; with equal remainders both advance.
fn aligned_matches(a: &[char], b: &[char]) -> usize {
    let (mut i, mut j, mut matches) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            matches += 1;
            i += 1;
            j += 1;
            continue;
        }
        let (rest_a, rest_b) = (a.len() - i, b.len() - j);
        if rest_a > rest_b {
            i += 1;
        } else if rest_b > rest_a {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    matches
}
