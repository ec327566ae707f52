//! Authentication extractors and role guards.
//!
//! 1. The client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the JWT and exposes its claims
//! 3. Role extractors (`RequireAdmin`, `RequireLecturer`, ...) reject callers
//!    lacking the role with 403
//!
//! Whole routers can be guarded with [`role::require_admin`] as a
//! `route_layer`.
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireStudent};
//!
//! async fn my_registrations(RequireStudent(auth_user): RequireStudent) -> impl IntoResponse {
//!     let user_id = auth_user.user_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
