// src/remote.rs
//! Bootstrap of a master server from a published plain-text document such as
//!
//! ```text
//! # current master
//! master=203.0.113.7:14000
//! ```
use log::{error, info};
use std::net::Ipv4Addr;

use crate::models::master::MasterServerConfig;

pub const REMOTE_MASTER_NAME: &str = "remote";

/// First `master=ip:port` line of `text`.
pub fn parse_master_document(text: &str) -> Option<(Ipv4Addr, u16)> {
    text.lines().find_map(|line| {
        let value = line.trim().strip_prefix("master=")?;
        let (ip, port) = value.trim().split_once(':')?;
        Some((ip.parse().ok()?, port.parse().ok()?))
    })
}

pub async fn fetch_remote_master(
    url: &str,
    priority: u32,
) -> Result<Option<MasterServerConfig>, Box<dyn std::error::Error + Send + Sync>> {
    info!("Fetching master server address from {}", url);
    let response = reqwest::get(url).await?.error_for_status()?;
    let text = response.text().await?;

    match parse_master_document(&text) {
        Some((ip, port)) => {
            info!("Remote master server is {}:{}", ip, port);
            Ok(Some(MasterServerConfig::new(REMOTE_MASTER_NAME, ip, port, priority)))
        }
        None => {
            error!("No master= line in document at {}", url);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_master_line() {
        let doc = "version=3\n  master=203.0.113.7:14000\nmaster=198.51.100.1:1\n";
        assert_eq!(parse_master_document(doc), Some((Ipv4Addr::new(203, 0, 113, 7), 14000)));
    }

    #[test]
    fn ignores_malformed_lines() {
        assert_eq!(parse_master_document("master=nowhere\nmaster=1.2.3.4:99999\n"), None);
        assert_eq!(parse_master_document(""), None);
        assert_eq!(
            parse_master_document("master=bad\nmaster=1.2.3.4:5\n"),
            Some((Ipv4Addr::new(1, 2, 3, 4), 5))
        );
    }
}
