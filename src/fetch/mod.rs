//! Discovery and probing.
//!
//! A fetch cycle walks the configured masters in priority order until one
//! answers ([`resolver`]), probes every server that master listed with a
//! bounded pool of workers ([`probe`]), and then commits the whole sweep to
//! the directory in one write ([`cycle`]).

pub mod cycle;
pub mod probe;
pub mod resolver;

pub use cycle::{FetchError, FetchSummary, Fetcher};
pub use probe::{probe_all, probe_candidate, unique_candidates, ProbeOutcome, ProbeResult};
pub use resolver::{resolve_masters, Resolution, ResolvedMaster};
