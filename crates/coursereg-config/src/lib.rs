//! # Coursereg Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetimes
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: token-bucket limits for the auth endpoints
//! - [`server`]: listen port and database pool size
//!
//! # Example
//!
//! ```ignore
//! use coursereg_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
