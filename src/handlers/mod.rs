pub mod refresh;
pub mod servers;

use governor::RateLimiter;

use crate::utils::IpRateLimiter;

/// Limiter for `GET /server/`.
pub struct ServerListLimiter(pub IpRateLimiter);

/// Limiter for `POST /server/refresh`.
pub struct RefreshLimiter(pub IpRateLimiter);

impl ServerListLimiter {
    pub fn new(quota: governor::Quota) -> Self {
        Self(RateLimiter::keyed(quota))
    }
}

impl RefreshLimiter {
    pub fn new(quota: governor::Quota) -> Self {
        Self(RateLimiter::keyed(quota))
    }
}
