mod db;
mod export;
mod extract;
mod listing;
mod scraper;
mod sections;

use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jobontop_scraper", about = "Job contact extractor for jobontop.be")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the job listing and populate the URL queue
    Init,
    /// Scrape unvisited job pages
    Scrape {
        /// Max pages to scrape (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract contact details from scraped pages
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Scrape + process in one pipeline
    Run {
        /// Max pages to scrape+process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract contact details from a CSV of scraped job text, no DB involved
    Batch {
        /// CSV file with scraped job text (url, bedrijf, solliciteren)
        #[arg(short, long)]
        input: String,
        /// Output CSV path
        #[arg(short, long, default_value = "job_data_structured.csv")]
        output: String,
    },
    /// Export all extracted contacts to CSV
    Export {
        /// Output CSV path
        #[arg(short, long, default_value = export::DEFAULT_EXPORT_PATH)]
        out: String,
    },
    /// Show scraping statistics
    Stats,
    /// Extracted contacts overview table
    Overview {
        /// Filter by location (e.g. "Antwerpen")
        #[arg(short, long)]
        location: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let client = scraper::http_client()?;
            let urls = listing::fetch_job_urls(&client).await?;
            let inserted = db::insert_pages(&conn, &urls)?;
            println!("Inserted {} new job URLs ({} total found)", inserted, urls.len());
            Ok(())
        }
        Commands::Scrape { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first or all pages are scraped.");
                return Ok(());
            }
            println!("Scraping {} pages (streaming to DB)...", pages.len());
            let stats = scraper::scrape_pages_streaming(&conn, pages).await?;
            println!(
                "Done: {} scraped ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'scrape' first.");
                return Ok(());
            }
            println!("Processing {} pages...", pages.len());
            let counts = process_pages(&conn, &pages)?;
            counts.print();
            Ok(())
        }
        Commands::Run { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first.");
                return Ok(());
            }

            // Phase 1: Scrape (streaming to DB)
            let t_scrape = Instant::now();
            println!("Pipeline: scraping {} pages (streaming to DB)...", pages.len());
            let stats = scraper::scrape_pages_streaming(&conn, pages).await?;
            println!(
                "Scraped {} pages ({} ok, {} errors) in {:.1}s",
                stats.total, stats.ok, stats.errors, t_scrape.elapsed().as_secs_f64()
            );

            // Phase 2: Process
            let t_process = Instant::now();
            let unprocessed = db::fetch_unprocessed(&conn, None)?;
            if unprocessed.is_empty() {
                println!("Nothing to process (all scraped pages had errors).");
                return Ok(());
            }
            println!("Processing {} pages...", unprocessed.len());
            let counts = process_pages(&conn, &unprocessed)?;
            println!(
                "Processed in {:.1}s",
                t_process.elapsed().as_secs_f64()
            );
            counts.print();
            Ok(())
        }
        Commands::Batch { input, output } => run_batch(&input, &output),
        Commands::Export { out } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let count = export::export_db(&conn, &out)?;
            println!("Exported {} contact rows to {}.", count, out);
            Ok(())
        }
        Commands::Overview { location, limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_overview(&conn, location.as_deref(), limit)?;
            if rows.is_empty() {
                println!("No contacts found.");
                return Ok(());
            }

            // Compact, readable table
            println!(
                "{:>3} | {:<24} | {:<14} | {:<18} | {:<24} | {:<16}",
                "#", "Company", "Location", "Contact", "Email", "Phone"
            );
            println!("{}", "-".repeat(114));

            for (i, r) in rows.iter().enumerate() {
                let name = truncate(&r.company_name, 24);
                let loc = truncate(&r.location, 14);
                let person = truncate(&r.contact_person, 18);
                let email = truncate(&r.email_addresses, 24);
                let phone = truncate(&r.phone_numbers, 16);

                println!(
                    "{:>3} | {:<24} | {:<14} | {:<18} | {:<24} | {:<16}",
                    i + 1, name, loc, person, email, phone
                );
            }

            // Addresses summary (separate section to avoid clutter)
            let with_address: Vec<_> = rows.iter().filter(|r| !r.address.is_empty()).collect();
            if !with_address.is_empty() {
                println!("\n--- Addresses ---");
                for r in &with_address {
                    println!("  {}: {}", truncate(&r.slug, 24), r.address);
                }
            }

            println!("\n{} jobs | slug: /jobs/<slug>", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Total:     {}", s.total);
            println!("Visited:   {}", s.visited);
            println!("Unvisited: {}", s.unvisited);
            println!("Scraped:   {}", s.scraped);
            println!("Errors:    {}", s.errors);
            println!("Processed: {}", s.processed);

            let e = db::get_extraction_summary(&conn)?;
            println!("\n--- Extraction ---");
            println!("Company names:   {}", e.company_names);
            println!("Locations:       {}", e.locations);
            println!("Contact persons: {}", e.contact_persons);
            println!("With email:      {}", e.with_email);
            println!("With phone:      {}", e.with_phone);
            println!("Addresses:       {}", e.addresses);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

struct ProcessCounts {
    rows: usize,
    company_names: usize,
    locations: usize,
    contact_persons: usize,
    with_email: usize,
    with_phone: usize,
    addresses: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} contact rows: {} company names, {} locations, {} contact persons, {} with email, {} with phone, {} addresses.",
            self.rows,
            self.company_names,
            self.locations,
            self.contact_persons,
            self.with_email,
            self.with_phone,
            self.addresses,
        );
    }
}

fn process_pages(
    conn: &rusqlite::Connection,
    pages: &[db::ScrapedPage],
) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        rows: 0,
        company_names: 0,
        locations: 0,
        contact_persons: 0,
        with_email: 0,
        with_phone: 0,
        addresses: 0,
    };

    for chunk in pages.chunks(500) {
        let rows: Vec<_> = chunk
            .par_iter()
            .map(|p| extract::extract_record(&p.url, &p.slug, &p.bedrijf, &p.solliciteren))
            .collect();

        for row in &rows {
            if row.company_name.is_some() {
                counts.company_names += 1;
            }
            if row.location.is_some() {
                counts.locations += 1;
            }
            if row.contact_person.is_some() {
                counts.contact_persons += 1;
            }
            if !row.emails.is_empty() {
                counts.with_email += 1;
            }
            if !row.phones.is_empty() {
                counts.with_phone += 1;
            }
            if row.address.is_some() {
                counts.addresses += 1;
            }
        }

        counts.rows += rows.len();
        db::save_contacts(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

/// One-shot extraction over a CSV of scraped job text. Useful for reruns
/// after a pattern tweak without touching the DB.
fn run_batch(input: &str, output: &str) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let jobs = export::read_jobs(input)?;
    if jobs.is_empty() {
        println!("No rows found in {}.", input);
        return Ok(());
    }

    println!("Extracting contact details from {} rows...", jobs.len());
    let rows: Vec<_> = jobs
        .par_iter()
        .map(|j| {
            let slug = listing::slug_from_url(&j.url);
            extract::extract_record(&j.url, &slug, &j.bedrijf, &j.solliciteren)
        })
        .collect();

    export::write_contacts(output, &rows)?;
    println!("Wrote {} rows to {}.", rows.len(), output);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
