use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{get_grade_sheet, get_my_grades, upsert_grade};

pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", put(upsert_grade))
        .route("/lophocphan/{id}", get(get_grade_sheet))
        .route("/me", get(get_my_grades))
}
