// src/fetch/probe.rs
use log::debug;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::FetchConfig;
use crate::models::server::{DiscoveredCandidate, ServerRecord};
use crate::net::udp_exchange;
use crate::protocol::{alias_request, parse_roster, parse_server_info, AliasType};

/// Largest info or roster reply read from a game server.
pub const SERVER_REPLY_MAX: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The info query was answered.
    Responded,
    /// The info query timed out or failed; the record is a placeholder.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub record: ServerRecord,
    pub outcome: ProbeOutcome,
}

/// Queries one candidate for its info and then its roster. Never fails: an
/// unanswered info query yields a placeholder whatever the roster said, an
/// unanswered roster query a live count of zero.
pub async fn probe_candidate(
    candidate: DiscoveredCandidate,
    master_id: Option<Uuid>,
    config: &FetchConfig,
) -> ProbeResult {
    let addr = candidate.socket_addr();

    let info = udp_exchange(addr, &alias_request(AliasType::Info), SERVER_REPLY_MAX, config.request_timeout).await;
    let roster = udp_exchange(addr, &alias_request(AliasType::Roster), SERVER_REPLY_MAX, config.request_timeout).await;

    let info = match info {
        Ok(reply) => parse_server_info(&reply),
        Err(e) => {
            debug!("Info query to {} failed: {}", addr, e);
            return ProbeResult {
                record: ServerRecord::placeholder(&candidate, master_id),
                outcome: ProbeOutcome::Unreachable,
            };
        }
    };

    let players = match roster {
        Ok(reply) => parse_roster(&reply).count(),
        Err(e) => {
            debug!("Roster query to {} failed: {}", addr, e);
            0
        }
    };

    debug!("Probed {}: {:?}, {} players", addr, info.name, players);

    let server_type = info.server_type();
    let name = info.display_name().to_string();
    ProbeResult {
        record: ServerRecord {
            ip: candidate.ip,
            port: candidate.port,
            players: u32::try_from(players).unwrap_or(u32::MAX),
            name,
            world: info.world.unwrap_or_default(),
            rules: info.rules.unwrap_or_default(),
            version: info.version.unwrap_or_default(),
            server_type,
            master_id,
        },
        outcome: ProbeOutcome::Responded,
    }
}

/// Drops repeated `(ip, port)` entries, keeping the first one listed.
pub fn unique_candidates(candidates: Vec<DiscoveredCandidate>) -> Vec<DiscoveredCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.ip, c.port)))
        .collect()
}

/// Probes every distinct candidate once with at most
/// `config.max_concurrent_probes` workers. Each worker pulls the next
/// candidate off a shared queue and reports over a channel; the result is
/// ordered by address, not by completion.
pub async fn probe_all(
    candidates: Vec<DiscoveredCandidate>,
    master_id: Option<Uuid>,
    config: &FetchConfig,
) -> Vec<ProbeResult> {
    let candidates = unique_candidates(candidates);
    if candidates.is_empty() {
        return Vec::new();
    }

    let workers = config.max_concurrent_probes.max(1).min(candidates.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(candidates)));
    let (tx, mut rx) = mpsc::unbounded_channel::<ProbeResult>();

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        let config = config.clone();
        handles.push(tokio::spawn(async move {
            loop {
                let next = queue.lock().pop_front();
                let Some(candidate) = next else { break };
                let result = probe_candidate(candidate, master_id, &config).await;
                if tx.send(result).is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    for handle in handles {
        if let Err(e) = handle.await {
            log::error!("Probe worker panicked: {}", e);
        }
    }

    results.sort_by_key(|r| r.record.key());
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn repeated_addresses_keep_first_entry() {
        let a = DiscoveredCandidate { ip: Ipv4Addr::new(10, 0, 0, 1), port: 2000, players: 1 };
        let a_again = DiscoveredCandidate { players: 9, ..a };
        let b = DiscoveredCandidate { port: 2001, ..a };

        assert_eq!(unique_candidates(vec![a, b, a_again]), vec![a, b]);
    }
}
