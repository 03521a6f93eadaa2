use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

pub const BASE_URL: &str = "https://www.jobontop.be";
pub const LISTING_URL: &str = "https://www.jobontop.be/jobs-dub.html";

static JOB_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.itemTitle.actItemTitle").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Fetch the jobs listing page and return `(url, slug)` for every posting.
pub async fn fetch_job_urls(client: &reqwest::Client) -> Result<Vec<(String, String)>> {
    info!("Fetching listing page {}", LISTING_URL);
    let html = client
        .get(LISTING_URL)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .context("listing page request failed")?
        .text()
        .await
        .context("listing page body unreadable")?;

    let links = parse_job_links(&html)?;
    info!("Found {} job links", links.len());
    Ok(links)
}

/// Pull job-detail links out of listing HTML. Every posting is announced by
/// an `h3.itemTitle.actItemTitle`; its link sits inside the h3 or, failing
/// that, anywhere under the h3's parent. Relative hrefs are resolved against
/// the site root. First occurrence of a URL wins.
pub fn parse_job_links(html: &str) -> Result<Vec<(String, String)>> {
    let doc = Html::parse_document(html);
    let base = Url::parse(BASE_URL).context("bad base url")?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for h3 in doc.select(&JOB_TITLE_SEL) {
        let anchor = h3.select(&ANCHOR_SEL).next().or_else(|| parent_anchor(h3));
        let Some(href) = anchor.and_then(|a| a.value().attr("href")) else {
            continue;
        };
        let Ok(url) = base.join(href) else {
            continue;
        };
        let url = url.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }
        let slug = slug_from_url(&url);
        links.push((url, slug));
    }
    Ok(links)
}

fn parent_anchor(h3: ElementRef) -> Option<ElementRef> {
    let parent = h3.parent().and_then(ElementRef::wrap)?;
    parent.select(&ANCHOR_SEL).next()
}

/// Short display name taken from the last path segment, without `.html`.
pub fn slug_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".html")
        .to_string()
}
