// src/models/master.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterServerConfig {
    pub id: Uuid,
    pub name: String,
    pub ip: Ipv4Addr,
    pub port: u16,
    pub is_active: bool,
    /// Lower values are tried first.
    pub priority: u32,
}

impl MasterServerConfig {
    pub fn new(name: impl Into<String>, ip: Ipv4Addr, port: u16, priority: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ip,
            port,
            is_active: true,
            priority,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

impl fmt::Display for MasterServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{}) - priority {}", self.name, self.ip, self.port, self.priority)
    }
}

/// Active masters in resolution order: priority ascending, ties kept in the
/// order they were given.
pub fn resolution_order(masters: &[MasterServerConfig]) -> Vec<MasterServerConfig> {
    let mut active: Vec<MasterServerConfig> = masters.iter().filter(|m| m.is_active).cloned().collect();
    active.sort_by_key(|m| m.priority);
    active
}
