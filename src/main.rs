use anyhow::{Context, Result};
use reqwest::Client;
use ringscraper::{
    catalog::{build_catalog, store, wikipedia_config},
    fetch,
    sort::sort_key,
    table::select_target_table,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure run ────────────────────────────────────────────
    let out_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ring_sizes.json"));
    let client = Client::builder()
        .user_agent(concat!("ringscraper/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    // ─── 3) fetch candidate tables & pick the equivalency table ──────
    let tables = fetch::fetch_size_tables(&client, fetch::RING_SIZE_URL).await?;
    let table = select_target_table(tables)
        .with_context(|| format!("selecting size table from {}", fetch::RING_SIZE_URL))?;

    // ─── 4) normalize into the catalog ───────────────────────────────
    let config = wikipedia_config();
    let build = build_catalog(&table, &config);
    if !build.warnings.is_empty() {
        warn!(
            warnings = build.warnings.len(),
            "catalog built with partial coverage"
        );
    }
    if build.catalog.is_empty() {
        anyhow::bail!(
            "catalog came out empty: {} warning(s), source layout likely changed",
            build.warnings.len()
        );
    }

    // ─── 5) persist & summarize ──────────────────────────────────────
    store::write_catalog(&out_path, &build.catalog)?;
    for (code, entry) in build.catalog.iter() {
        let mut labels: Vec<&str> = entry.sizes.keys().map(String::as_str).collect();
        labels.sort_by_key(|l| sort_key(l));
        info!(
            code,
            name = %entry.display_name,
            sizes = labels.len(),
            range = %format!("{} … {}", labels.first().unwrap_or(&""), labels.last().unwrap_or(&"")),
            "standard"
        );
    }

    info!(path = %out_path.display(), "all done");
    Ok(())
}
