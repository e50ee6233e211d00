use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use crate::metrics::CATALOG_SIZE;
use crate::ranking::BusinessLocation;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog fetch failed: {0}")]
    Http(#[from] reqwest::Error),
}

// Current snapshot of business rows, swapped whole on refresh
pub struct Catalog {
    records: RwLock<Arc<Vec<BusinessLocation>>>,
}

impl Catalog {
    pub fn new(records: Vec<BusinessLocation>) -> Self {
        CATALOG_SIZE.set(records.len() as f64);
        Self {
            records: RwLock::new(Arc::new(records)),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<BusinessLocation>> {
        let guard = self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    pub fn replace(&self, records: Vec<BusinessLocation>) {
        CATALOG_SIZE.set(records.len() as f64);
        let mut guard = self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(records);
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

pub fn parse_rows(json: &str) -> Result<Vec<BusinessLocation>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_file(path: &Path) -> Result<Vec<BusinessLocation>, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    parse_rows(&raw)
}

pub async fn fetch_remote(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<BusinessLocation>, CatalogError> {
    let rows = client
        .get(url)
        .timeout(Duration::from_secs(10))
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<BusinessLocation>>()
        .await?;
    Ok(rows)
}

// Refreshes the catalog from `url` on every tick; a failed fetch keeps the old snapshot
pub async fn catalog_refresher(
    catalog: Arc<Catalog>,
    client: reqwest::Client,
    url: String,
    every: Duration,
) {
    let mut ticker = interval(every);

    info!(url = %url, interval = ?every, "Catalog refresher started");

    loop {
        ticker.tick().await;

        match fetch_remote(&client, &url).await {
            Ok(rows) => {
                let before = catalog.len();
                catalog.replace(rows);
                if before != catalog.len() {
                    info!(businesses = catalog.len(), "Catalog refreshed");
                }
            }
            Err(e) => warn!(error = %e, "Catalog refresh failed, keeping previous snapshot"),
        }
    }
}
