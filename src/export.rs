use std::io::Read;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::Deserialize;
use tracing::warn;

use crate::db::{self, ContactRow, VALUE_DELIMITER};

pub const DEFAULT_EXPORT_PATH: &str = "data/job_contacts.csv";

const CSV_HEADERS: [&str; 7] = [
    "url",
    "company_name",
    "location",
    "contact_person",
    "email_addresses",
    "phone_numbers",
    "address",
];

/// One row of scraped job text, as produced by an earlier scrape run.
#[derive(Debug, Deserialize)]
pub struct JobTextRow {
    pub url: String,
    #[serde(default)]
    pub bedrijf: String,
    #[serde(default)]
    pub solliciteren: String,
}

/// Read scraped job text from a CSV file. Rows that fail to parse are
/// logged and skipped so one bad line never sinks a batch.
pub fn read_jobs(path: &str) -> Result<Vec<JobTextRow>> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open {}", path))?;
    Ok(read_jobs_from_reader(file))
}

fn read_jobs_from_reader<R: Read>(rdr: R) -> Vec<JobTextRow> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(rdr);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping bad CSV row: {}", e),
        }
    }
    rows
}

/// Write contact rows to a CSV file.
pub fn write_contacts(path: &str, rows: &[ContactRow]) -> Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path))?;
    write_contacts_to(&mut wtr, rows)?;
    wtr.flush()?;
    Ok(())
}

fn write_contacts_to<W: std::io::Write>(wtr: &mut csv::Writer<W>, rows: &[ContactRow]) -> Result<()> {
    wtr.write_record(CSV_HEADERS)?;

    for row in rows {
        let emails = row.emails.join(VALUE_DELIMITER);
        let phones = row.phones.join(VALUE_DELIMITER);
        wtr.write_record([
            row.url.as_str(),
            row.company_name.as_deref().unwrap_or(""),
            row.location.as_deref().unwrap_or(""),
            row.contact_person.as_deref().unwrap_or(""),
            emails.as_str(),
            phones.as_str(),
            row.address.as_deref().unwrap_or(""),
        ])?;
    }
    Ok(())
}

/// Dump every extracted contact row from the DB to a CSV file.
pub fn export_db(conn: &Connection, path: &str) -> Result<usize> {
    let rows = db::fetch_all_contacts(conn)?;
    write_contacts(path, &rows)?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str) -> ContactRow {
        ContactRow {
            url: url.to_string(),
            slug: "test-job".to_string(),
            company_name: None,
            location: None,
            contact_person: None,
            emails: Vec::new(),
            phones: Vec::new(),
            address: None,
        }
    }

    #[test]
    fn parses_rows_and_defaults_missing_columns() {
        let input = "url,bedrijf\nhttps://example.be/job,Een zaak in Gent\n";
        let rows = read_jobs_from_reader(input.as_bytes());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "https://example.be/job");
        assert_eq!(rows[0].bedrijf, "Een zaak in Gent");
        assert_eq!(rows[0].solliciteren, "");
    }

    #[test]
    fn skips_malformed_rows() {
        let input = "url,bedrijf,solliciteren\nhttps://example.be/ok,tekst,meer tekst\nhttps://example.be/broken,te kort\n";
        let rows = read_jobs_from_reader(input.as_bytes());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "https://example.be/ok");
    }

    #[test]
    fn writes_expected_headers_and_joined_values() {
        let mut contact = row("https://example.be/job");
        contact.company_name = Some("Ciconia".to_string());
        contact.emails = vec!["jan@x.be".to_string(), "sofie@x.be".to_string()];

        let mut wtr = csv::Writer::from_writer(vec![]);
        write_contacts_to(&mut wtr, &[contact]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("url,company_name,location,contact_person,email_addresses,phone_numbers,address")
        );
        assert_eq!(
            lines.next(),
            Some("https://example.be/job,Ciconia,,,jan@x.be; sofie@x.be,,")
        );
    }

    #[test]
    fn empty_optionals_become_empty_fields() {
        let mut wtr = csv::Writer::from_writer(vec![]);
        write_contacts_to(&mut wtr, &[row("https://example.be/leeg")]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(out.lines().nth(1), Some("https://example.be/leeg,,,,,,"));
    }

    #[test]
    fn extracted_rows_serialize_to_expected_cells() {
        // The whole batch path in miniature: job text through the extractors
        // into CSV cells.
        let job = JobTextRow {
            url: "https://www.jobontop.be/jobs/kok-ciconia.html".to_string(),
            bedrijf: "Restaurant Ciconia is een gezellige zaak in het hart van Sint-Niklaas."
                .to_string(),
            solliciteren: "Bel 0470 12 34 56 of mail jobs@zaak.be".to_string(),
        };
        let contact = crate::extract::extract_record(&job.url, "kok-ciconia", &job.bedrijf, &job.solliciteren);

        let mut wtr = csv::Writer::from_writer(vec![]);
        write_contacts_to(&mut wtr, &[contact]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(
            out.lines().nth(1),
            Some("https://www.jobontop.be/jobs/kok-ciconia.html,Ciconia,Sint-Niklaas,,jobs@zaak.be,0470123456,")
        );
    }
}
