// src/scheduler.rs
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::Fetcher;
use crate::storage::DirectoryStore;

/// Runs a cycle now, then again every refresh interval. The interval is read
/// from the store before each wait so changes apply to the next one.
pub async fn run_periodic<S: DirectoryStore + ?Sized>(fetcher: Arc<Fetcher<S>>) {
    loop {
        info!("Fetching server data...");
        match fetcher.run_fetch_cycle().await {
            Ok(summary) => info!(
                "Fetch done: {} master(s) tried, {} candidates, {} responded, {} unreachable",
                summary.masters_tried, summary.candidates, summary.successes, summary.timeouts
            ),
            Err(e) => error!("Fetch failed: {}", e),
        }

        let interval = fetcher.store().refresh_interval().seconds.max(1);
        info!("Next fetch in {} seconds", interval);
        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}
