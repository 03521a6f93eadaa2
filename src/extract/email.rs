use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Scan text for email addresses. Matches are lower-cased and deduplicated,
/// first occurrence wins.
pub fn extract(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lower = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for m in EMAIL_RE.find_iter(&lower) {
        if seen.insert(m.as_str().to_string()) {
            emails.push(m.as_str().to_string());
        }
    }
    emails
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_address() {
        let emails = extract("Stuur je cv naar jan.peeters@example.com vandaag");
        assert_eq!(emails, vec!["jan.peeters@example.com"]);
    }

    #[test]
    fn lowercases_matches() {
        let emails = extract("Mail naar Info@Restaurant-Ciconia.BE");
        assert_eq!(emails, vec!["info@restaurant-ciconia.be"]);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let emails = extract("jobs@zaak.be of JOBS@zaak.be of hr@zaak.be");
        assert_eq!(emails, vec!["jobs@zaak.be", "hr@zaak.be"]);
    }

    #[test]
    fn empty_text() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn no_match_in_plain_text() {
        assert!(extract("Solliciteren kan via de website").is_empty());
    }

    #[test]
    fn address_with_plus_and_percent() {
        let emails = extract("contact: sollicitatie+keuken@grand-cafe.be.");
        assert_eq!(emails, vec!["sollicitatie+keuken@grand-cafe.be"]);
    }
}
