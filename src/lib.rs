//! # WoS server directory
//!
//! Discovers game servers registered with one or more master servers over
//! UDP, probes each of them for its name, world, rules and live player count,
//! and republishes the result into a persisted directory.
//!
//! The entry point is [`fetch::Fetcher::run_fetch_cycle`]. A cycle:
//!
//! 1. asks the active masters, in priority order, for their server list until
//!    one answers within the request timeout;
//! 2. decodes the master's binary reply into candidates, dropping privileged
//!    ports and the reserved test network;
//! 3. sends every candidate an info and a roster query with a bounded pool of
//!    workers, turning silent servers into "awaiting response" placeholders;
//! 4. replaces the stored server set with the sweep and stamps the fetch log.
//!
//! If no master answers, the previous directory and fetch log are left as
//! they were.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wos_directory::config::FetchConfig;
//! use wos_directory::fetch::Fetcher;
//! use wos_directory::models::master::MasterServerConfig;
//! use wos_directory::storage::memory::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     store.add_master(MasterServerConfig::new("main", "203.0.113.7".parse()?, 14000, 1))?;
//!
//!     let fetcher = Fetcher::new(store, FetchConfig::default());
//!     let summary = fetcher.run_fetch_cycle().await?;
//!     println!("{} servers, {} unreachable", summary.candidates, summary.timeouts);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fetch;
pub mod handlers;
pub mod models;
pub mod net;
pub mod protocol;
pub mod remote;
pub mod scheduler;
pub mod storage;
pub mod utils;
