/// Picks the display name of a cluster: prefer names without a `*` marker,
/// then names carrying punctuation (`.,&-'`), then mixed case, then the
/// longest. Ties keep the earliest name. Empty input gives `""`.
pub fn best_representative<S: AsRef<str>>(names: &[S]) -> &str {
    let mut best: Option<(RankKey, &str)> = None;
    for name in names.iter().map(AsRef::as_ref) {
        let key = rank(name);
        if best.as_ref().map_or(true, |(b, _)| key > *b) {
            best = Some((key, name));
        }
    }
    best.map(|(_, name)| name).unwrap_or("")
}

type RankKey = (bool, bool, bool, usize);

fn rank(name: &str) -> RankKey {
    (
        !name.contains('*'),
        name.chars().any(|c| ".,&-'".contains(c)),
        name.chars().any(char::is_lowercase),
        name.chars().count(),
    )
}

/// Capitalizes each whitespace-separated word: `ACME TOWING llc` ->
/// `Acme Towing Llc`.
pub fn standardize(name: &str) -> String {
    name.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_punctuated_mixed_case_names() {
        let names = ["ABBOTTS GARAGE", "Abbott's Garage", "ABBOTT'S GARAGE"];
        assert_eq!(best_representative(&names), "Abbott's Garage");
    }

    #[test]
    fn asterisk_names_lose() {
        let names = ["*COD Cash Customer, Walk-in", "COD CASH CUSTOMERS"];
        assert_eq!(best_representative(&names), "COD CASH CUSTOMERS");
    }

    #[test]
    fn longest_wins_then_earliest() {
        assert_eq!(best_representative(&["ACME", "ACME CO"]), "ACME CO");
        assert_eq!(best_representative(&["ACME A", "ACME B"]), "ACME A");
        let empty: [&str; 0] = [];
        assert_eq!(best_representative(&empty), "");
    }

    #[test]
    fn standardize_capitalizes_words() {
        assert_eq!(standardize("ABBOTT'S  GARAGE & wrecker"), "Abbott's Garage & Wrecker");
        assert_eq!(standardize("a&a EXPRESS llc"), "A&a Express Llc");
        assert_eq!(standardize("   "), "");
    }
}
