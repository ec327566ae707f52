use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{
    cancel_registration, get_my_registrations, get_registrations, register,
};

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register).get(get_registrations))
        .route("/me", get(get_my_registrations))
        .route("/{id}", delete(cancel_registration))
}
