// src/fetch/resolver.rs
use log::{debug, info, warn};

use crate::config::FetchConfig;
use crate::models::master::MasterServerConfig;
use crate::models::server::DiscoveredCandidate;
use crate::net::{udp_exchange, ExchangeError};
use crate::protocol::{alias_request, decode_candidates, AliasType};

/// Largest discovery reply read from a master.
pub const MASTER_REPLY_MAX: usize = 4096;

#[derive(Debug, Clone)]
pub struct ResolvedMaster {
    pub master: MasterServerConfig,
    pub candidates: Vec<DiscoveredCandidate>,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub masters_tried: usize,
    /// `None` when no master answered.
    pub resolved: Option<ResolvedMaster>,
}

/// Asks each master in turn for its server list and stops at the first one
/// that answers. `masters` must already be in resolution order.
pub async fn resolve_masters(masters: &[MasterServerConfig], config: &FetchConfig) -> Resolution {
    let request = alias_request(AliasType::Discovery);
    let mut masters_tried = 0;

    for master in masters {
        masters_tried += 1;
        debug!("Querying master server {}", master);

        match udp_exchange(master.socket_addr(), &request, MASTER_REPLY_MAX, config.request_timeout).await {
            Ok(reply) => {
                let candidates = decode_candidates(&reply, &config.reserved_network);
                info!(
                    "Master server {} answered with {} bytes, {} candidates",
                    master.name,
                    reply.len(),
                    candidates.len()
                );
                return Resolution {
                    masters_tried,
                    resolved: Some(ResolvedMaster { master: master.clone(), candidates }),
                };
            }
            Err(ExchangeError::Timeout) => {
                warn!("No response from master server {} within {:?}", master, config.request_timeout);
            }
            Err(e) => {
                warn!("Master server {} unreachable: {}", master, e);
            }
        }
    }

    Resolution { masters_tried, resolved: None }
}
