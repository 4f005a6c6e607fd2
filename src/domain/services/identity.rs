use unicode_normalization::UnicodeNormalization;

const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Key used to detect two bookings by the same person in one gira.
///
/// Trims, lowercases, decomposes to NFD and drops the combining marks in
/// U+0300..=U+036F, so "José" and " jose " collide.
pub fn normalize_identity(raw_name: &str) -> String {
    raw_name
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_case_and_padding() {
        assert_eq!(normalize_identity("  José da Conceição  "), "jose da conceicao");
    }

    #[test]
    fn equivalent_spellings_share_a_key() {
        assert_eq!(normalize_identity("MARIA ÂNGELA"), normalize_identity("maria angela"));
    }

    #[test]
    fn inner_whitespace_is_kept() {
        assert_ne!(normalize_identity("ana maria"), normalize_identity("anamaria"));
    }

    #[test]
    fn precomposed_and_decomposed_forms_match() {
        assert_eq!(normalize_identity("Jo\u{00e3}o"), normalize_identity("Joa\u{0303}o"));
    }

    #[test]
    fn blank_name_normalizes_to_empty() {
        assert_eq!(normalize_identity(" \t "), "");
    }
}
