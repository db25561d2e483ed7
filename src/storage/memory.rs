// src/storage/memory.rs
use log::{debug, info};
use parking_lot::RwLock;
use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::directory::{Directory, FetchLog, RefreshInterval};
use crate::models::master::{resolution_order, MasterServerConfig};
use crate::models::server::ServerRecord;
use crate::storage::{DirectoryStore, StoreError};

/// In-memory directory, optionally mirrored to a JSON file after every write.
pub struct MemoryStore {
    directory: RwLock<Directory>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            directory: RwLock::new(Directory::default()),
            path: None,
        }
    }

    /// Opens the directory persisted at `path`; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let directory = match fs::read(&path) {
            Ok(bytes) => {
                let directory: Directory = serde_json::from_slice(&bytes)?;
                info!(
                    "Loaded directory from {} ({} masters, {} servers)",
                    path.display(),
                    directory.masters.len(),
                    directory.servers.len()
                );
                directory
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No directory at {}, starting empty", path.display());
                Directory::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            directory: RwLock::new(directory),
            path: Some(path),
        })
    }

    pub fn snapshot(&self) -> Directory {
        self.directory.read().clone()
    }

    pub fn masters(&self) -> Vec<MasterServerConfig> {
        self.directory.read().masters.clone()
    }

    pub fn has_master(&self, ip: Ipv4Addr, port: u16) -> bool {
        self.directory.read().masters.iter().any(|m| m.ip == ip && m.port == port)
    }

    pub fn add_master(&self, master: MasterServerConfig) -> Result<(), StoreError> {
        self.update(|directory| {
            debug!("Adding master server {}", master);
            directory.masters.push(master);
        })
    }

    /// Returns false if no master has that id.
    pub fn set_master_active(&self, id: Uuid, is_active: bool) -> Result<bool, StoreError> {
        self.update_master(id, |m| m.is_active = is_active)
    }

    pub fn set_master_priority(&self, id: Uuid, priority: u32) -> Result<bool, StoreError> {
        self.update_master(id, |m| m.priority = priority)
    }

    /// Removing a master also drops the records it yielded.
    pub fn remove_master(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut removed = false;
        self.update(|directory| {
            let before = directory.masters.len();
            directory.masters.retain(|m| m.id != id);
            removed = directory.masters.len() != before;
            if removed {
                directory.servers.retain(|s| s.master_id != Some(id));
            }
        })?;
        Ok(removed)
    }

    pub fn set_refresh_interval(&self, seconds: u64) -> Result<(), StoreError> {
        self.update(|directory| directory.refresh_interval = Some(RefreshInterval { seconds }))
    }

    fn update_master(&self, id: Uuid, f: impl FnOnce(&mut MasterServerConfig)) -> Result<bool, StoreError> {
        let mut found = false;
        self.update(|directory| {
            if let Some(master) = directory.masters.iter_mut().find(|m| m.id == id) {
                f(master);
                found = true;
            }
        })?;
        Ok(found)
    }

    // The write lock is held across persisting so readers and the file never
    // disagree about the latest committed state.
    fn update(&self, f: impl FnOnce(&mut Directory)) -> Result<(), StoreError> {
        let mut directory = self.directory.write();
        let mut next = directory.clone();
        f(&mut next);
        if let Some(path) = &self.path {
            persist(path, &next)?;
        }
        *directory = next;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryStore for MemoryStore {
    fn active_masters(&self) -> Vec<MasterServerConfig> {
        resolution_order(&self.directory.read().masters)
    }

    fn commit_sweep(&self, records: Vec<ServerRecord>, fetched_at: u64) -> Result<(), StoreError> {
        self.update(|directory| {
            directory.servers = records;
            directory.fetch_log = FetchLog { last_fetched: Some(fetched_at) };
        })
    }

    fn servers(&self) -> Vec<ServerRecord> {
        self.directory.read().servers.clone()
    }

    fn fetch_log(&self) -> FetchLog {
        self.directory.read().fetch_log
    }

    fn refresh_interval(&self) -> RefreshInterval {
        self.directory.read().refresh_interval.unwrap_or_default()
    }
}

fn persist(path: &Path, directory: &Directory) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(directory)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
