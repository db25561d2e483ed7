use std::env;
use std::fmt;
use std::net::Ipv4Addr;
use std::num::NonZeroU32;
use std::time::Duration;
use governor::Quota;
use ipnetwork::Ipv4Network;

use crate::models::directory::DEFAULT_REFRESH_INTERVAL_SECS;
use crate::models::master::MasterServerConfig;
use crate::protocol::DEFAULT_RESERVED_NETWORK;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 10;

/// Knobs of a single fetch cycle.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub request_timeout: Duration,
    pub max_concurrent_probes: usize,
    pub reserved_network: Ipv4Network,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
            reserved_network: *DEFAULT_RESERVED_NETWORK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidMaster(String),
    InvalidNetwork(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaster(entry) => {
                write!(f, "Invalid master server entry '{}', expected name@ip:port[/priority]", entry)
            }
            Self::InvalidNetwork(value) => write!(f, "Invalid reserved network '{}'", value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    // HTTP surface
    pub bind_address: String,
    pub port: u16,

    // Rate limiting configs
    pub server_list_period_secs: u64,
    pub server_list_burst_limit: u32,
    pub refresh_period_secs: u64,
    pub refresh_burst_limit: u32,

    // Fetch cycle
    pub fetch: FetchConfig,
    pub refresh_interval_secs: u64,

    // Directory sources
    pub directory_path: Option<String>,
    pub master_servers: Vec<MasterServerConfig>,
    pub master_config_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            server_list_period_secs: 5,
            server_list_burst_limit: 60,
            refresh_period_secs: 60,
            refresh_burst_limit: 1,
            fetch: FetchConfig::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            directory_path: None,
            master_servers: Vec::new(),
            master_config_url: None,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let reserved_network = match env_opt("RESERVED_NETWORK") {
            Some(value) => value
                .trim()
                .parse::<Ipv4Network>()
                .map_err(|_| ConfigError::InvalidNetwork(value.clone()))?,
            None => defaults.fetch.reserved_network,
        };

        let master_servers = match env_opt("MASTER_SERVERS") {
            Some(value) => parse_master_list(&value)?,
            None => Vec::new(),
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_or("PORT", defaults.port),

            server_list_period_secs: env_or("SERVER_LIST_PERIOD_SECS", defaults.server_list_period_secs),
            server_list_burst_limit: env_or("SERVER_LIST_BURST_LIMIT", defaults.server_list_burst_limit),
            refresh_period_secs: env_or("REFRESH_PERIOD_SECS", defaults.refresh_period_secs),
            refresh_burst_limit: env_or("REFRESH_BURST_LIMIT", defaults.refresh_burst_limit),

            fetch: FetchConfig {
                request_timeout: Duration::from_millis(env_or("REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)),
                max_concurrent_probes: env_or("MAX_CONCURRENT_PROBES", DEFAULT_MAX_CONCURRENT_PROBES).max(1),
                reserved_network,
            },
            refresh_interval_secs: env_or("REFRESH_INTERVAL_SECS", defaults.refresh_interval_secs),

            directory_path: env_opt("DIRECTORY_PATH"),
            master_servers,
            master_config_url: env_opt("MASTER_CONFIG_URL"),
        })
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn server_list_quota(&self) -> Quota {
        quota(self.server_list_period_secs, self.server_list_burst_limit)
    }

    pub fn refresh_quota(&self) -> Quota {
        quota(self.refresh_period_secs, self.refresh_burst_limit)
    }
}

fn quota(period_secs: u64, burst: u32) -> Quota {
    let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
    Quota::with_period(Duration::from_secs(period_secs))
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}

/// Parses `name@ip:port[/priority],...`. Without a priority, entries are
/// numbered in the order given, starting at 1.
pub fn parse_master_list(value: &str) -> Result<Vec<MasterServerConfig>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(i, entry)| parse_master_entry(entry, i as u32 + 1))
        .collect()
}

fn parse_master_entry(entry: &str, default_priority: u32) -> Result<MasterServerConfig, ConfigError> {
    let invalid = || ConfigError::InvalidMaster(entry.to_string());

    let (name, address) = entry.split_once('@').ok_or_else(invalid)?;
    let (address, priority) = match address.split_once('/') {
        Some((address, priority)) => (address, priority.parse::<u32>().map_err(|_| invalid())?),
        None => (address, default_priority),
    };
    let (ip, port) = address.split_once(':').ok_or_else(invalid)?;
    let ip: Ipv4Addr = ip.parse().map_err(|_| invalid())?;
    let port: u16 = port.parse().map_err(|_| invalid())?;

    if name.trim().is_empty() || port == 0 {
        return Err(invalid());
    }

    Ok(MasterServerConfig::new(name.trim(), ip, port, priority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_master_list_with_and_without_priority() {
        let masters = parse_master_list("main@10.1.2.3:14000/5, backup@10.1.2.4:14001").unwrap();

        assert_eq!(masters.len(), 2);
        assert_eq!(masters[0].name, "main");
        assert_eq!(masters[0].ip, Ipv4Addr::new(10, 1, 2, 3));
        assert_eq!(masters[0].port, 14000);
        assert_eq!(masters[0].priority, 5);
        assert_eq!(masters[1].priority, 2);
        assert!(masters.iter().all(|m| m.is_active));
    }

    #[test]
    fn rejects_malformed_master_entries() {
        for bad in ["10.1.2.3:14000", "x@host:14000", "x@10.1.2.3", "x@10.1.2.3:0", "x@10.1.2.3:1/high", "@10.1.2.3:1"] {
            assert!(
                matches!(parse_master_list(bad), Err(ConfigError::InvalidMaster(_))),
                "accepted {}",
                bad
            );
        }
        assert!(parse_master_list(" , ").unwrap().is_empty());
    }

    #[test]
    fn fetch_defaults() {
        let config = FetchConfig::default();

        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.max_concurrent_probes, 10);
        assert!(config.reserved_network.contains(Ipv4Addr::new(3, 3, 9, 9)));
        assert!(!config.reserved_network.contains(Ipv4Addr::new(3, 4, 0, 0)));
    }
}
