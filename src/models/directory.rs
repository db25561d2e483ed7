// src/models/directory.rs
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::master::MasterServerConfig;
use crate::models::server::ServerRecord;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchLog {
    /// Unix seconds of the last completed cycle.
    pub last_fetched: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshInterval {
    pub seconds: u64,
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self { seconds: DEFAULT_REFRESH_INTERVAL_SECS }
    }
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub masters: Vec<MasterServerConfig>,
    #[serde(default)]
    pub servers: Vec<ServerRecord>,
    #[serde(default)]
    pub fetch_log: FetchLog,
    /// Unset until an interval is configured; readers fall back to the default.
    #[serde(default)]
    pub refresh_interval: Option<RefreshInterval>,
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
