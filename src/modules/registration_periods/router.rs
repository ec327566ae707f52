use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_period, delete_period, get_open_periods, get_period, get_periods, update_period,
};

pub fn init_registration_periods_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_period).get(get_periods))
        .route("/open", get(get_open_periods))
        .route(
            "/{id}",
            get(get_period).put(update_period).delete(delete_period),
        )
}
