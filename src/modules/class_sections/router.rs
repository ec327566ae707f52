use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_class_section, delete_class_section, get_class_section, get_class_sections,
    get_roster, update_class_section,
};

pub fn init_class_sections_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class_section).get(get_class_sections))
        .route(
            "/{id}",
            get(get_class_section)
                .put(update_class_section)
                .delete(delete_class_section),
        )
        .route("/{id}/sinhvien", get(get_roster))
}
