use anyhow::Result;
use rusqlite::Connection;

const DB_PATH: &str = "data/jobontop.sqlite";

/// Separator for multi-valued fields stored flat (emails, phones).
pub const VALUE_DELIMITER: &str = "; ";

pub fn connect() -> Result<Connection> {
    std::fs::create_dir_all("data")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            slug       TEXT NOT NULL,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id           INTEGER PRIMARY KEY,
            page_id      INTEGER NOT NULL REFERENCES pages(id),
            url          TEXT NOT NULL,
            slug         TEXT NOT NULL,
            bedrijf      TEXT,
            solliciteren TEXT,
            extras       TEXT,
            status       INTEGER,
            error        TEXT,
            latency_ms   INTEGER,
            scraped_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_url ON page_data(url);

        -- Extracted contact records, one per posting
        CREATE TABLE IF NOT EXISTS contacts (
            url             TEXT PRIMARY KEY,
            slug            TEXT NOT NULL,
            company_name    TEXT,
            location        TEXT,
            contact_person  TEXT,
            email_addresses TEXT NOT NULL DEFAULT '',
            phone_numbers   TEXT NOT NULL DEFAULT '',
            address         TEXT,
            extracted_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_contacts_slug ON contacts(slug);
        CREATE INDEX IF NOT EXISTS idx_contacts_location ON contacts(location);
        ",
    )?;
    Ok(())
}

// ── Scraping ──

pub fn insert_pages(conn: &Connection, pages: &[(String, String)]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url, slug) VALUES (?1, ?2)")?;
        for (url, slug) in pages {
            count += stmt.execute(rusqlite::params![url, slug])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_unvisited(
    conn: &Connection,
    limit: Option<usize>,
) -> Result<Vec<(i64, String, String)>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT id, url, slug FROM pages WHERE visited = 0 ORDER BY id LIMIT {}",
            n
        ),
        None => "SELECT id, url, slug FROM pages WHERE visited = 0 ORDER BY id".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct ScrapeRow {
    pub page_id: i64,
    pub url: String,
    pub slug: String,
    pub bedrijf: Option<String>,
    pub solliciteren: Option<String>,
    pub extras: Option<String>,
    pub status: Option<i32>,
    pub error: Option<String>,
    pub latency_ms: Option<i64>,
}

// ── Processing ──

pub struct ScrapedPage {
    pub slug: String,
    pub url: String,
    pub bedrijf: String,
    pub solliciteren: String,
}

/// Successfully scraped pages that have no contact record yet. Pages whose
/// scrape failed are excluded; a rescrape clears the error first.
pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<ScrapedPage>> {
    let sql = format!(
        "SELECT pd.slug, pd.url, COALESCE(pd.bedrijf, ''), COALESCE(pd.solliciteren, '')
         FROM page_data pd
         LEFT JOIN contacts c ON c.url = pd.url
         WHERE pd.error IS NULL AND c.url IS NULL
         ORDER BY pd.id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ScrapedPage {
                slug: row.get(0)?,
                url: row.get(1)?,
                bedrijf: row.get(2)?,
                solliciteren: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Extracted data ──

#[derive(Debug, Clone, PartialEq)]
pub struct ContactRow {
    pub url: String,
    pub slug: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub contact_person: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub address: Option<String>,
}

pub fn save_contacts(conn: &Connection, rows: &[ContactRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO contacts
             (url, slug, company_name, location, contact_person, email_addresses, phone_numbers, address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.url,
                r.slug,
                r.company_name,
                r.location,
                r.contact_person,
                r.emails.join(VALUE_DELIMITER),
                r.phones.join(VALUE_DELIMITER),
                r.address,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn fetch_all_contacts(conn: &Connection) -> Result<Vec<ContactRow>> {
    let mut stmt = conn.prepare(
        "SELECT url, slug, company_name, location, contact_person,
                email_addresses, phone_numbers, address
         FROM contacts
         ORDER BY slug",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ContactRow {
                url: row.get(0)?,
                slug: row.get(1)?,
                company_name: row.get(2)?,
                location: row.get(3)?,
                contact_person: row.get(4)?,
                emails: split_values(&row.get::<_, String>(5)?),
                phones: split_values(&row.get::<_, String>(6)?),
                address: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn split_values(joined: &str) -> Vec<String> {
    joined
        .split(VALUE_DELIMITER)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Overview ──

pub struct OverviewRow {
    pub slug: String,
    pub company_name: String,
    pub location: String,
    pub contact_person: String,
    pub email_addresses: String,
    pub phone_numbers: String,
    pub address: String,
}

pub fn fetch_overview(
    conn: &Connection,
    location: Option<&str>,
    limit: usize,
) -> Result<Vec<OverviewRow>> {
    let mut conditions = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(loc) = location {
        conditions.push(format!("location = ?{}", params.len() + 1));
        params.push(Box::new(loc.to_string()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT slug, COALESCE(company_name,''), COALESCE(location,''),
                COALESCE(contact_person,''), email_addresses, phone_numbers,
                COALESCE(address,'')
         FROM contacts{}
         ORDER BY slug
         LIMIT {}",
        where_clause, limit
    );

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(OverviewRow {
                slug: row.get(0)?,
                company_name: row.get(1)?,
                location: row.get(2)?,
                contact_person: row.get(3)?,
                email_addresses: row.get(4)?,
                phone_numbers: row.get(5)?,
                address: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub scraped: usize,
    pub errors: usize,
    pub processed: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let visited: usize =
        conn.query_row("SELECT COUNT(*) FROM pages WHERE visited = 1", [], |r| r.get(0))?;
    let scraped: usize = conn.query_row("SELECT COUNT(*) FROM page_data", [], |r| r.get(0))?;
    let errors: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let processed: usize = conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?;
    Ok(Stats {
        total,
        visited,
        unvisited: total - visited,
        scraped,
        errors,
        processed,
    })
}

pub struct ExtractionSummary {
    pub company_names: usize,
    pub locations: usize,
    pub contact_persons: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub addresses: usize,
}

pub fn get_extraction_summary(conn: &Connection) -> Result<ExtractionSummary> {
    let company_names: usize =
        conn.query_row("SELECT COUNT(company_name) FROM contacts", [], |r| r.get(0))?;
    let locations: usize =
        conn.query_row("SELECT COUNT(location) FROM contacts", [], |r| r.get(0))?;
    let contact_persons: usize =
        conn.query_row("SELECT COUNT(contact_person) FROM contacts", [], |r| r.get(0))?;
    let with_email: usize = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE email_addresses != ''",
        [],
        |r| r.get(0),
    )?;
    let with_phone: usize = conn.query_row(
        "SELECT COUNT(*) FROM contacts WHERE phone_numbers != ''",
        [],
        |r| r.get(0),
    )?;
    let addresses: usize =
        conn.query_row("SELECT COUNT(address) FROM contacts", [], |r| r.get(0))?;
    Ok(ExtractionSummary {
        company_names,
        locations,
        contact_persons,
        with_email,
        with_phone,
        addresses,
    })
}
