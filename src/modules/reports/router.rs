use axum::{Router, middleware, routing::get};

use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller::{get_grade_distribution, get_period_statistics, get_transcript};

pub fn init_reports_router(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/dotdangky/{id}/thong-ke", get(get_period_statistics))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/lophocphan/{id}/phan-bo-diem", get(get_grade_distribution))
        .route("/sinhvien/{id}/bang-diem", get(get_transcript))
        .merge(admin)
}
