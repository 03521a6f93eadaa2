use std::sync::LazyLock;

use regex::Regex;

// Ordered cascade over the application text. Labels, role markers and bare
// capitalized names before a phone label, roughly from explicit to loose.
static PERSON_CASCADE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // explicit label: "Contactpersoon: ..." / "t.a.v. ..."
        r"(?i)(?:contactpersoon|contact person|t\.a\.v\.|tav)\s*:?\s*([A-Za-z][A-Za-z\s\-\.]{2,40}?)(?:\s*[TM]:|tel|phone|mail|\n|$)",
        // "hr" or "sollicitatie" followed by the name
        r"(?i)(?:hr|sollicitatie)\s+(?:collega's?\s+)?([A-Za-z][A-Za-z\s\-\.]{2,40})(?:\s+via|\s*[TM]:|tel|phone|mail|\n|$)",
        // "<naam> | zaakvoerder" style role markers
        r"(?i)([A-Za-z][A-Za-z\s\-\.]{2,40})\s*\|\s*(?:zaakvoer|manager|verantwoordelijke)",
        // "bij/naar <naam>" right before contact details
        r"(?i)(?:bij|naar)\s+([A-Za-z][A-Za-z\s\-\.]{5,40})(?:\s+via|\s*[TM]:|tel|phone|mail)",
        // bare "Voornaam Achternaam" directly before a phone label
        r"(?i)([A-Z][a-z]+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\s*(?:[TM]:|tel|phone)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Candidates containing any of these are labels or boilerplate, not names.
const NOISE_WORDS: &[&str] = &["info", "mail", "jobs", "email", "sollicitatie", "button"];

/// Find the person to address an application to.
pub fn extract(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    for re in PERSON_CASCADE.iter() {
        if let Some(caps) = re.captures(text) {
            let person = caps[1].trim();
            if person.chars().count() > 3 && !contains_noise(person) {
                return Some(person.to_string());
            }
        }
    }
    None
}

fn contains_noise(person: &str) -> bool {
    let lower = person.to_lowercase();
    NOISE_WORDS.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_contact_person() {
        let person = extract("Contactpersoon: Jan Peeters T: 0470 12 34 56");
        assert_eq!(person.as_deref(), Some("Jan Peeters"));
    }

    #[test]
    fn tav_label() {
        let person = extract("Stuur je cv t.a.v. Els Van Damme mail: els@zaak.be");
        assert_eq!(person.as_deref(), Some("Els Van Damme"));
    }

    #[test]
    fn role_marker() {
        let person = extract("Vragen? Sofie Claes | zaakvoerder");
        assert_eq!(person.as_deref(), Some("Sofie Claes"));
    }

    #[test]
    fn name_before_phone_label() {
        let person = extract("Solliciteer vandaag nog. Karen Wouters M: 0496 11 22 33");
        assert_eq!(person.as_deref(), Some("Karen Wouters"));
    }

    #[test]
    fn noise_candidates_are_dropped() {
        assert_eq!(extract("Contactpersoon: info mail ons gerust"), None);
    }

    #[test]
    fn empty_text() {
        assert_eq!(extract(""), None);
    }
}
