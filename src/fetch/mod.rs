// src/fetch/mod.rs
pub mod html;

pub use html::parse_tables;

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::table::RawTable;

/// Source page carrying the ring-size equivalency table.
pub const RING_SIZE_URL: &str = "https://en.wikipedia.org/wiki/Ring_size";

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// GET a page body with a bounded retry loop. Transient transport errors
/// and non-success statuses are retried; the last failure surfaces.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let mut attempt = 0;
    loop {
        attempt += 1;

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => {
                    info!(url, bytes = body.len(), "fetched page");
                    return Ok(body);
                }
                Err(_) if attempt < MAX_RETRIES => {
                    warn!(url, attempt, "failed reading body, retrying");
                    sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e.into()),
            },
            Ok(resp) if attempt < MAX_RETRIES => {
                warn!(url, attempt, status = %resp.status(), "bad status, retrying");
                sleep(RETRY_DELAY).await;
            }
            Ok(resp) => {
                return Err(anyhow::anyhow!(
                    "HTTP error fetching {}: {}",
                    url,
                    resp.status()
                ))
            }
            Err(_) if attempt < MAX_RETRIES => {
                warn!(url, attempt, "request failed, retrying");
                sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Fetch `url` and return every table on it as a [`RawTable`], in document
/// order. Picking the one relevant table is the extractor's job.
pub async fn fetch_size_tables(client: &Client, url: &str) -> Result<Vec<RawTable>> {
    let body = fetch_page(client, url).await?;
    let tables = parse_tables(&body);
    info!(url, tables = tables.len(), "parsed candidate tables");
    Ok(tables)
}
