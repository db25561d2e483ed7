// src/models/server.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use uuid::Uuid;

pub const UNKNOWN_SERVER_NAME: &str = "Unknown Server";
pub const AWAITING_RESPONSE_NAME: &str = "Awaiting response";

/// Closed set of game server flavours, derived from the info reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerType {
    #[default]
    Mix,
    ReMix,
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mix => write!(f, "Mix"),
            Self::ReMix => write!(f, "ReMix"),
        }
    }
}

/// A game server as advertised by a master, not yet probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredCandidate {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub players: u16,
}

impl DiscoveredCandidate {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub players: u32,
    pub name: String,
    pub world: String,
    pub rules: String,
    pub version: String,
    pub server_type: ServerType,
    pub master_id: Option<Uuid>,
}

impl ServerRecord {
    /// Record for a candidate that never answered the info query. Carries only
    /// what the master advertised.
    pub fn placeholder(candidate: &DiscoveredCandidate, master_id: Option<Uuid>) -> Self {
        Self {
            ip: candidate.ip,
            port: candidate.port,
            players: u32::from(candidate.players),
            name: AWAITING_RESPONSE_NAME.to_string(),
            world: String::new(),
            rules: String::new(),
            version: String::new(),
            server_type: ServerType::default(),
            master_id,
        }
    }

    pub fn key(&self) -> (Ipv4Addr, u16) {
        (self.ip, self.port)
    }
}
