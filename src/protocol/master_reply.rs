// src/protocol/master_reply.rs
use byteorder::{ByteOrder, LittleEndian};
use ipnetwork::Ipv4Network;
use lazy_static::lazy_static;
use std::net::Ipv4Addr;

use crate::models::server::DiscoveredCandidate;

/// Width of one server entry in a discovery reply.
pub const RECORD_SIZE: usize = 12;

/// Lowest port a listed game server may use.
pub const MIN_SERVER_PORT: u16 = 1024;

lazy_static! {
    /// Test network masters list alongside real servers.
    pub static ref DEFAULT_RESERVED_NETWORK: Ipv4Network = {
        let base = Ipv4Addr::new(3, 3, 0, 0);
        Ipv4Network::new(base, 16).unwrap_or_else(|_| Ipv4Network::from(base))
    };
}

/// Every complete record in `data`, unfiltered. A trailing partial record is
/// dropped.
///
/// Layout per record: IPv4 octets (4), port LE (2), players LE (2), reserved (4).
pub fn decode_records(data: &[u8]) -> Vec<DiscoveredCandidate> {
    data.chunks_exact(RECORD_SIZE)
        .map(|record| DiscoveredCandidate {
            ip: Ipv4Addr::new(record[0], record[1], record[2], record[3]),
            port: LittleEndian::read_u16(&record[4..6]),
            players: LittleEndian::read_u16(&record[6..8]),
        })
        .collect()
}

/// Decodes a discovery reply and drops entries on privileged ports or inside
/// `reserved`.
pub fn decode_candidates(data: &[u8], reserved: &Ipv4Network) -> Vec<DiscoveredCandidate> {
    decode_records(data)
        .into_iter()
        .filter(|c| c.port >= MIN_SERVER_PORT && !reserved.contains(c.ip))
        .collect()
}
