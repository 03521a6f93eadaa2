pub mod address;
pub mod company;
pub mod contact_person;
pub mod email;
pub mod location;
pub mod phone;

use crate::db::ContactRow;

/// Run every field extractor over one job posting and assemble the flat
/// contact record. Company name and location come from the company
/// description; everything else comes from the application text. Location
/// falls back to the application text when the description has none.
///
/// Always returns a row, even when every extractor comes up empty.
pub fn extract_record(url: &str, slug: &str, bedrijf: &str, solliciteren: &str) -> ContactRow {
    let company_name = company::extract(bedrijf);
    let location = location::extract(bedrijf).or_else(|| location::extract(solliciteren));
    let contact_person = contact_person::extract(solliciteren);
    let emails = email::extract(solliciteren);
    let phones = phone::extract(solliciteren);
    let address = address::extract(solliciteren);

    ContactRow {
        url: url.to_string(),
        slug: slug.to_string(),
        company_name,
        location,
        contact_person,
        emails,
        phones,
        address,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::split_page;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
    }

    fn record_from_fixture(name: &str, url: &str, slug: &str) -> ContactRow {
        let sections = split_page(&fixture(name));
        extract_record(url, slug, &sections.bedrijf, &sections.solliciteren)
    }

    #[test]
    fn full_posting() {
        let row = record_from_fixture(
            "ciconia.html",
            "https://www.jobontop.be/jobs/kok-ciconia.html",
            "kok-ciconia",
        );
        assert_eq!(row.company_name.as_deref(), Some("Ciconia"));
        assert_eq!(row.location.as_deref(), Some("Sint-Niklaas"));
        assert_eq!(row.contact_person.as_deref(), Some("Jan Peeters"));
        assert_eq!(row.emails, vec!["jan.peeters@ciconia.be"]);
        assert_eq!(row.phones, vec!["0470123456"]);
        assert_eq!(
            row.address.as_deref(),
            Some("Stationsstraat 12, 9100 Sint-Niklaas")
        );
    }

    #[test]
    fn override_and_location_fallback() {
        let row = record_from_fixture(
            "bibliotheek.html",
            "https://www.jobontop.be/jobs/kelner-bibliotheek.html",
            "kelner-bibliotheek",
        );
        assert_eq!(row.company_name.as_deref(), Some("Eetcafe de Bibliotheek"));
        // The description has no place name; the gazetteer hit comes from
        // the application text.
        assert_eq!(row.location.as_deref(), Some("Dendermonde"));
        assert_eq!(row.contact_person, None);
        assert_eq!(row.emails, vec!["info@bibliotheek.be"]);
        assert!(row.phones.is_empty());
        assert_eq!(
            row.address.as_deref(),
            Some("Kerkstraat 5, 9200 Dendermonde")
        );
    }

    #[test]
    fn location_prefers_company_block() {
        // Both blocks name a place; the company description wins even though
        // Brussel sits earlier in the gazetteer.
        let row = extract_record(
            "https://www.jobontop.be/jobs/z.html",
            "z",
            "Onze zaak ligt in Gent.",
            "Solliciteer via ons kantoor te Brussel.",
        );
        assert_eq!(row.location.as_deref(), Some("Gent"));
    }

    #[test]
    fn page_without_known_sections() {
        let row = record_from_fixture(
            "missing.html",
            "https://www.jobontop.be/jobs/anders.html",
            "anders",
        );
        assert_eq!(row.url, "https://www.jobontop.be/jobs/anders.html");
        assert_eq!(row.company_name, None);
        assert_eq!(row.location, None);
        assert_eq!(row.contact_person, None);
        assert!(row.emails.is_empty());
        assert!(row.phones.is_empty());
        assert_eq!(row.address, None);
    }

    #[test]
    fn empty_blocks_still_yield_a_row() {
        let row = extract_record("https://www.jobontop.be/jobs/x.html", "x", "", "");
        assert_eq!(row.url, "https://www.jobontop.be/jobs/x.html");
        assert_eq!(row.slug, "x");
        assert_eq!(row.company_name, None);
        assert!(row.emails.is_empty());
        assert!(row.phones.is_empty());
    }

    #[test]
    fn duplicate_contact_details_collapse() {
        let sol = "Mail jobs@zaak.be of bel 0470 12 34 56. Nogmaals: jobs@zaak.be, 0470 12 34 56.";
        let row = extract_record("https://www.jobontop.be/jobs/y.html", "y", "", sol);
        assert_eq!(row.emails, vec!["jobs@zaak.be"]);
        assert_eq!(row.phones, vec!["0470123456"]);
    }

    #[test]
    fn repeated_runs_give_identical_records() {
        let sections = split_page(&fixture("ciconia.html"));
        let url = "https://www.jobontop.be/jobs/kok-ciconia.html";
        let first = extract_record(url, "kok-ciconia", &sections.bedrijf, &sections.solliciteren);
        let second = extract_record(url, "kok-ciconia", &sections.bedrijf, &sections.solliciteren);
        assert_eq!(first, second);
    }
}
