use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::ScrapeRow;
use crate::sections;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
// One request per second keeps the site happy.
const REQUEST_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;

/// Scrape stats returned after completion.
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Scrape pages one at a time with a delay between requests, saving each
/// result to DB as it arrives. A failed page becomes an error row and the
/// run keeps going.
pub async fn scrape_pages_streaming(
    conn: &Connection,
    pages: Vec<(i64, String, String)>,
) -> Result<ScrapeStats> {
    let client = http_client()?;
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Prepare statements once, reuse for each row
    let mut insert_stmt = conn.prepare(
        "INSERT INTO page_data (page_id, url, slug, bedrijf, solliciteren, extras, status, error, latency_ms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    let mut update_stmt = conn.prepare(
        "UPDATE pages SET visited = 1, visited_at = datetime('now') WHERE id = ?1",
    )?;

    let mut ok = 0usize;
    let mut errors = 0usize;

    for (i, (page_id, url, slug)) in pages.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(REQUEST_DELAY).await;
        }

        let row = scrape_with_retry(&client, page_id, &url, &slug).await;
        if row.error.is_some() {
            errors += 1;
        } else {
            ok += 1;
        }

        save_one(&mut insert_stmt, &mut update_stmt, &row)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Scraped {} pages ({} ok, {} errors)", total, ok, errors);

    Ok(ScrapeStats { total, ok, errors })
}

/// Save a single scrape result to DB using pre-prepared statements.
fn save_one(
    insert: &mut rusqlite::Statement,
    update: &mut rusqlite::Statement,
    row: &ScrapeRow,
) -> Result<()> {
    insert.execute(rusqlite::params![
        row.page_id,
        row.url,
        row.slug,
        row.bedrijf,
        row.solliciteren,
        row.extras,
        row.status,
        row.error,
        row.latency_ms,
    ])?;
    update.execute(rusqlite::params![row.page_id])?;
    Ok(())
}

async fn scrape_with_retry(
    client: &reqwest::Client,
    page_id: i64,
    url: &str,
    slug: &str,
) -> ScrapeRow {
    for attempt in 0..MAX_RETRIES {
        let row = scrape_one(client, page_id, url, slug).await;

        let should_retry = match &row.error {
            Some(e) if e.contains("429") => true,
            Some(e) if e.contains("500") || e.contains("502") || e.contains("503") => true,
            _ => false,
        };

        if !should_retry {
            return row;
        }

        let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
        warn!(
            "Transient failure on {} (attempt {}/{}), backing off {:.1}s",
            slug,
            attempt + 1,
            MAX_RETRIES,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
    }

    scrape_one(client, page_id, url, slug).await
}

/// Fetch one job page and cut it into its text blocks. Errors land in the
/// row, not in a Result: the caller records them and moves on.
async fn scrape_one(client: &reqwest::Client, page_id: i64, url: &str, slug: &str) -> ScrapeRow {
    let start = Instant::now();
    let fetched = fetch_html(client, url).await;
    let elapsed = start.elapsed().as_millis() as i64;

    match fetched {
        Ok((status, html)) => {
            let page = sections::split_page(&html);
            ScrapeRow {
                page_id,
                url: url.to_string(),
                slug: slug.to_string(),
                bedrijf: Some(page.bedrijf),
                solliciteren: Some(page.solliciteren),
                extras: encode_extras(&page.extras),
                status: Some(status),
                error: None,
                latency_ms: Some(elapsed),
            }
        }
        Err(e) => {
            warn!("Scrape failed for {}: {}", slug, e);
            ScrapeRow {
                page_id,
                url: url.to_string(),
                slug: slug.to_string(),
                bedrijf: None,
                solliciteren: None,
                extras: None,
                status: None,
                error: Some(e.to_string()),
                latency_ms: Some(elapsed),
            }
        }
    }
}

async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<(i32, String)> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP {}", status.as_u16());
    }
    let body = response.text().await?;
    Ok((status.as_u16() as i32, body))
}

fn encode_extras(extras: &[(String, String)]) -> Option<String> {
    if extras.is_empty() {
        return None;
    }
    let items: Vec<serde_json::Value> = extras
        .iter()
        .map(|(heading, text)| serde_json::json!({ "heading": heading, "text": text }))
        .collect();
    serde_json::to_string(&items).ok()
}
