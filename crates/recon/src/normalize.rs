//! Canonical uppercase forms of raw customer names.
//!
//! Two strengths exist. [`clean`] only strips phone numbers and punctuation;
//! [`normalize_for_matching`] first rewrites punctuation that carries meaning
//! (`&`, `+`, possessives) so the catch-all stripping cannot destroy it.
//! Both are pure and idempotent.

use std::sync::OnceLock;

use regex::Regex;

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("phone pattern is valid")
    })
}

fn amp_r_i_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&R\.I").expect("&R.I pattern is valid"))
}

fn amp_r_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&R\.").expect("&R. pattern is valid"))
}

fn amp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*&\s*").expect("& pattern is valid"))
}

fn possessive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'S\b").expect("possessive pattern is valid"))
}

/// Literal substitutions applied after the `&` rules, in order.
const PUNCTUATION_RULES: [(&str, &str); 11] = [
    (".", " "),
    (",", " "),
    ("'", ""),
    ("-", " "),
    ("/", " "),
    ("+", " AND "),
    (":", " "),
    (";", " "),
    ("*", ""),
    ("`", ""),
    ("\"", ""),
];

/// Strict cleanup: uppercase, drop phone numbers, turn every character outside
/// `A-Z`, `0-9` and space into a space, collapse whitespace.
pub fn clean(name: &str) -> String {
    settle(name, clean_pass)
}

/// Looser cleanup used before tokenization. Expands `&` and `+` to `AND`,
/// folds possessives (`ABBOTT'S` -> `ABBOTTS`) and then applies the same
/// stripping as [`clean`].
pub fn normalize_for_matching(name: &str) -> String {
    settle(name, normalize_pass)
}

fn clean_pass(name: &str) -> String {
    let upper = name.to_uppercase();
    let without_phones = phone_re().replace_all(upper.trim(), "");
    strip_to_alphanumeric(&without_phones)
}

fn normalize_pass(name: &str) -> String {
    let upper = name.to_uppercase();
    let mut s = phone_re().replace_all(upper.trim(), "").into_owned();

    // &R.I and &R. must run before the generic & rule.
    s = amp_r_i_re().replace_all(&s, " AND R I").into_owned();
    s = amp_r_re().replace_all(&s, " AND R ").into_owned();
    s = amp_re().replace_all(&s, " AND ").into_owned();
    s = possessive_re().replace_all(&s, "S").into_owned();

    for (from, to) in PUNCTUATION_RULES {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }

    strip_to_alphanumeric(&s)
}

fn strip_to_alphanumeric(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Re-applies `pass` until the output stops changing. Stripping punctuation
/// can expose a phone number (`555_123_4567`), so a single pass is not
/// idempotent on its own. Every extra pass only removes text.
fn settle(name: &str, pass: fn(&str) -> String) -> String {
    let mut current = pass(name);
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
