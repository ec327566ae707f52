use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_lecturer, delete_lecturer, get_lecturer, get_lecturers, get_my_class_sections,
    update_lecturer,
};

pub fn init_lecturers_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lecturer).get(get_lecturers))
        .route("/me/lophocphan", get(get_my_class_sections))
        .route(
            "/{id}",
            get(get_lecturer).put(update_lecturer).delete(delete_lecturer),
        )
}
