// src/fetch/cycle.rs
use log::{error, info, warn};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::FetchConfig;
use crate::fetch::probe::{probe_all, ProbeOutcome};
use crate::fetch::resolver::resolve_masters;
use crate::models::directory::unix_now;
use crate::models::master::{resolution_order, MasterServerConfig};
use crate::storage::{DirectoryStore, StoreError};

#[derive(Debug)]
pub enum FetchError {
    NoActiveMaster,
    Store(StoreError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveMaster => write!(f, "No active master server configured"),
            Self::Store(e) => write!(f, "Failed to commit sweep: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoActiveMaster => None,
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for FetchError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub masters_tried: usize,
    /// Name of the master whose list was probed; `None` if every master
    /// was silent and the directory was left untouched.
    pub master: Option<String>,
    pub candidates: usize,
    pub successes: usize,
    pub timeouts: usize,
    /// Unix seconds stamped into the fetch log, if the sweep was committed.
    pub fetched_at: Option<u64>,
}

impl FetchSummary {
    pub fn committed(&self) -> bool {
        self.fetched_at.is_some()
    }
}

/// Runs fetch cycles against a directory store. Cycles never overlap: a
/// trigger that arrives mid-cycle waits for the running one to finish.
pub struct Fetcher<S: ?Sized> {
    store: Arc<S>,
    config: FetchConfig,
    running: Mutex<()>,
}

impl<S: DirectoryStore + ?Sized> Fetcher<S> {
    pub fn new(store: Arc<S>, config: FetchConfig) -> Self {
        Self {
            store,
            config,
            running: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// One cycle over the store's active masters.
    pub async fn run_fetch_cycle(&self) -> Result<FetchSummary, FetchError> {
        self.run_with_masters(None).await
    }

    /// One cycle over `masters` if given (inactive ones are skipped), otherwise
    /// over the store's active masters.
    pub async fn run_with_masters(
        &self,
        masters: Option<&[MasterServerConfig]>,
    ) -> Result<FetchSummary, FetchError> {
        let _running = self.running.lock().await;

        let masters = match masters {
            Some(explicit) => resolution_order(explicit),
            None => self.store.active_masters(),
        };
        if masters.is_empty() {
            error!("Fetch cycle aborted: no active master server configured");
            return Err(FetchError::NoActiveMaster);
        }

        info!("Starting fetch cycle over {} master server(s)", masters.len());
        let resolution = resolve_masters(&masters, &self.config).await;

        let Some(resolved) = resolution.resolved else {
            warn!(
                "No master server answered ({} tried); keeping the previous directory",
                resolution.masters_tried
            );
            return Ok(FetchSummary {
                masters_tried: resolution.masters_tried,
                ..FetchSummary::default()
            });
        };

        let results = probe_all(resolved.candidates, Some(resolved.master.id), &self.config).await;
        let candidates = results.len();

        let successes = results.iter().filter(|r| r.outcome == ProbeOutcome::Responded).count();
        let timeouts = results.len() - successes;
        let records = results.into_iter().map(|r| r.record).collect();

        let fetched_at = unix_now();
        self.store.commit_sweep(records, fetched_at)?;

        info!(
            "Fetch cycle complete via {}: {} candidates, {} responded, {} unreachable",
            resolved.master.name, candidates, successes, timeouts
        );

        Ok(FetchSummary {
            masters_tried: resolution.masters_tried,
            master: Some(resolved.master.name),
            candidates,
            successes,
            timeouts,
            fetched_at: Some(fetched_at),
        })
    }
}
