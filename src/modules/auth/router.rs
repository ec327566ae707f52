use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_governor::GovernorLayer;

use crate::state::AppState;

use super::controller::{change_password, login, me, refresh};

/// Login and refresh are public and rate limited per client IP when limiting
/// is enabled.
pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let mut public = Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh));

    if let Some(config) = state.rate_limit_config.auth_governor_config() {
        public = public.layer(GovernorLayer::new(Arc::new(config)));
    }

    Router::new()
        .merge(public)
        .route("/me", get(me))
        .route("/change-password", put(change_password))
}
