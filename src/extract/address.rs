use std::sync::LazyLock;

use regex::Regex;

// From explicit "adres:" labels down to loose street-and-number shapes.
static ADDRESS_CASCADE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // labeled address
        r"(?i)(?:adres|address)(?:\s+van\s+de\s+werkplek)?:?\s*([A-Za-z][A-Za-z0-9\s\-,\.]{10,80})(?:\n|contact|tel|mail|of|$)",
        // street + number + postal code + town
        r"(?i)([A-Za-z][A-Za-z\s]{2,40}\s+\d+[A-Za-z]?\s*\d{4}\s+[A-Za-z][A-Za-z\s\-]{2,20})",
        // postal code + town
        r"(?i)(\d{4}\s+[A-Za-z][A-Za-z\s\-]{2,20})",
        // street + number, optionally followed by postal code and town
        r"(?i)([A-Za-z][A-Za-z\s]{5,40}\s+\d+[A-Za-z]?(?:\s+\d{4})?(?:\s+[A-Za-z][A-Za-z\s\-]{2,20})?)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const MIN_ADDRESS_LEN: usize = 10;

/// Find a street address in the application text. A candidate needs some
/// length and at least one digit to count.
pub fn extract(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    for re in ADDRESS_CASCADE.iter() {
        if let Some(caps) = re.captures(text) {
            let address = caps[1].trim();
            if address.chars().count() > MIN_ADDRESS_LEN
                && address.chars().any(|c| c.is_ascii_digit())
            {
                return Some(address.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_address() {
        let addr = extract("Adres: Grote Markt 7, 2800 Mechelen");
        assert_eq!(addr.as_deref(), Some("Grote Markt 7, 2800 Mechelen"));
    }

    #[test]
    fn street_number_postal_town() {
        let addr = extract("Kom langs: Stationsstraat 12 9300 Aalst");
        assert_eq!(addr.as_deref(), Some("Stationsstraat 12 9300 Aalst"));
    }

    #[test]
    fn postal_and_town_only() {
        let addr = extract("2000 Antwerpen");
        assert_eq!(addr.as_deref(), Some("2000 Antwerpen"));
    }

    #[test]
    fn candidate_without_digits_is_rejected() {
        assert_eq!(extract("Adres: nog niet bekend, volgt later wel"), None);
    }

    #[test]
    fn empty_text() {
        assert_eq!(extract(""), None);
    }
}
