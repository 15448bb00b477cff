use anyhow::Result;
use reqwest::blocking::Client;
use revscraper::{clean, config::Config, extract, fetch, report, store::RevenueStore};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = Config::load()?;
    info!(url = %config.url, db = %config.db_path.display(), "configured");

    // ─── 3) fetch the page ───────────────────────────────────────────
    let client = Client::new();
    let html = fetch::fetch_page(&client, &config)?;

    // ─── 4) extract + normalize the table ────────────────────────────
    let raw = extract::extract_table(&html, &config.expected_headers)?;
    info!(rows = raw.rows.len(), "extracted table");
    let table = extract::normalize(raw)?;

    // ─── 5) clean into typed records ─────────────────────────────────
    let records = clean::clean_table(&table)?;
    info!(records = records.len(), "cleaned records");

    // ─── 6) persist ──────────────────────────────────────────────────
    let mut store = RevenueStore::open(&config)?;
    store.append(&records)?;

    // ─── 7) read back + report ───────────────────────────────────────
    let persisted = store.read_all()?;
    info!(rows = persisted.len(), "read back from {}", config.db_path.display());
    for record in &persisted {
        debug!(date = %record.date, value = record.value, "row");
    }
    report::render_all(&persisted, &config)?;

    info!("all done");
    Ok(())
}
