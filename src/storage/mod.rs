// src/storage/mod.rs
pub mod memory;

use std::fmt;
use std::io;

use crate::models::directory::{FetchLog, RefreshInterval};
use crate::models::master::MasterServerConfig;
use crate::models::server::ServerRecord;

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "directory file error: {}", e),
            Self::Serialize(e) => write!(f, "directory encoding error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

/// Persisted directory the fetch cycle reads masters from and writes sweeps to.
pub trait DirectoryStore: Send + Sync {
    /// Active masters, priority ascending, ties in insertion order.
    fn active_masters(&self) -> Vec<MasterServerConfig>;

    /// Replaces every server record and stamps the fetch log in one write.
    fn commit_sweep(&self, records: Vec<ServerRecord>, fetched_at: u64) -> Result<(), StoreError>;

    fn servers(&self) -> Vec<ServerRecord>;

    fn fetch_log(&self) -> FetchLog;

    fn refresh_interval(&self) -> RefreshInterval;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn store_errors_chain_their_cause() {
        let err = StoreError::from(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        let source = err.source().and_then(|s| s.downcast_ref::<io::Error>());
        assert_eq!(source.map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));

        let json = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StoreError::from(json);
        assert!(err.source().and_then(|s| s.downcast_ref::<serde_json::Error>()).is_some());
    }
}
