pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Case-insensitive substring containment over normalized text.
pub(crate) fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize_text(haystack).contains(&normalize_text(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_invisible_characters_and_case() {
        assert_eq!(
            normalize_text("\u{feff}Technical  University   of Munich"),
            "technical university of munich"
        );
    }

    #[test]
    fn containment_ignores_case_and_spacing() {
        assert!(contains_normalized("Technical University of Munich", "MUNICH"));
        assert!(!contains_normalized("Technical University of Munich", "Vienna"));
    }
}
