use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_me, get_student, get_students, update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route("/me", get(get_me))
        .route(
            "/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
