use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// Everything that cannot appear in a written-out phone number becomes a
// space before matching, so "tel: 0470/12.34.56" scans the same as a bare
// number. The slash stays in: it is a common Belgian area-code separator.
static NON_PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d\+\-\.\s\(\)/]").unwrap());

// Belgian number shapes, with optional +32/0032 prefix and optional (0).
// The four-cluster national format is tried before the area-code form so
// that "0470 12 34 56" is taken whole instead of truncated at eight digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:\+|00)32\s?)?(?:\(0\))?(?:\d{4}[\s\-\./]?\d{2}[\s\-\./]?\d{2}[\s\-\./]?\d{2}|0\d{1,2}[\s\-\./]?\d{2,3}[\s\-\./]?\d{2,3}[\s\-\./]?\d{2,3})",
    )
    .unwrap()
});

const MIN_PHONE_LEN: usize = 9;

/// Scan text for phone numbers. Each match is compacted by dropping all
/// whitespace; too-short matches are noise (postal codes, years) and are
/// skipped. Deduplicated, first occurrence wins.
pub fn extract(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let cleaned = NON_PHONE_RE.replace_all(text, " ");
    let mut seen = HashSet::new();
    let mut phones = Vec::new();
    for m in PHONE_RE.find_iter(&cleaned) {
        let phone: String = m.as_str().chars().filter(|c| !c.is_whitespace()).collect();
        if phone.len() >= MIN_PHONE_LEN && seen.insert(phone.clone()) {
            phones.push(phone);
        }
    }
    phones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_with_spaces() {
        let phones = extract("Bel ons op tel: 0470 12 34 56 voor meer info");
        assert_eq!(phones, vec!["0470123456"]);
    }

    #[test]
    fn landline_with_area_code() {
        let phones = extract("T: 03 216 34 56");
        assert_eq!(phones, vec!["032163456"]);
    }

    #[test]
    fn slash_and_dot_separators() {
        let phones = extract("GSM 0470/12.34.56");
        assert_eq!(phones, vec!["0470/12.34.56"]);
    }

    #[test]
    fn international_prefix() {
        let phones = extract("+32 0470 12 34 56");
        assert_eq!(phones, vec!["+320470123456"]);
    }

    #[test]
    fn postal_code_is_not_a_phone() {
        assert!(extract("gelegen in 2000 Antwerpen").is_empty());
    }

    #[test]
    fn dedup_and_order() {
        let phones = extract("0470 12 34 56 of 03 216 34 56 of 0470 12 34 56");
        assert_eq!(phones, vec!["0470123456", "032163456"]);
    }

    #[test]
    fn empty_text() {
        assert!(extract("").is_empty());
    }
}
