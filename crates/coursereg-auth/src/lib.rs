//! # Coursereg Auth
//!
//! Roles, JWT claim structures and token utilities.
//!
//! - [`roles`]: the three account roles and their wire codes
//! - [`claims`]: access and refresh token claims
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use coursereg_auth::{Role, create_access_token, verify_token};
//! use coursereg_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "sv001@example.edu", "Nguyen Van A", vec![Role::Student], &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert!(claims.has_role(Role::Student));
//! ```

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{create_access_token, create_refresh_token, verify_refresh_token, verify_token};
pub use roles::Role;
