// src/utils.rs
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::RateLimiter;
use log::error;
use std::fmt;
use std::net::IpAddr;

use crate::fetch::FetchError;

/// Per-client-IP limiter shared by the HTTP handlers.
pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    RateLimitExceeded,
    NoActiveMaster,
    FetchFailed(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::NoActiveMaster => write!(f, "No active master server configured"),
            Self::FetchFailed(reason) => write!(f, "Fetch failed: {}", reason),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().body(self.to_string()),
            Self::NoActiveMaster => HttpResponse::ServiceUnavailable().body(self.to_string()),
            Self::FetchFailed(_) => HttpResponse::InternalServerError().body(self.to_string()),
            Self::MissingPeerIP => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

impl From<FetchError> for RequestError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NoActiveMaster => Self::NoActiveMaster,
            other => Self::FetchFailed(other.to_string()),
        }
    }
}

pub fn peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    req.peer_addr().map(|addr| addr.ip()).ok_or(RequestError::MissingPeerIP)
}

/// Fails with `RateLimitExceeded` once `ip` has used up its quota.
pub fn check_rate_limit(limiter: &IpRateLimiter, ip: IpAddr, what: &str) -> Result<(), RequestError> {
    if limiter.check_key(&ip).is_err() {
        error!("Rate limit exceeded for {} for ip: {}", what, ip);
        return Err(RequestError::RateLimitExceeded);
    }
    Ok(())
}
