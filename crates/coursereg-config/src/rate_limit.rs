//! Rate limiting configuration for the authentication endpoints.
//!
//! Login and token refresh are throttled per client IP with a token bucket
//! (Governor). General API traffic is not limited.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: `false` turns limiting off (default: `true`)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: replenish interval, in seconds, for one token (default: 2)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size (default: 10)
//!
//! The client IP is taken from `x-forwarded-for` / `x-real-ip` / `forwarded`
//! headers first and the peer address second, so the limiter works behind a
//! reverse proxy.

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::env_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 2,
            auth_burst_size: 10,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Limiting switched off, used by tests that fire many logins.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Governor configuration for the auth routes, `None` when limiting is
    /// disabled or the configured values are zero.
    #[must_use]
    pub fn auth_governor_config(
        &self,
    ) -> Option<GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware>> {
        if !self.enabled {
            return None;
        }

        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second)
            .burst_size(self.auth_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
    }
}
