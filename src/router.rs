use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Json, Router, extract::State, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::auth::init_auth_router;
use crate::modules::class_sections::init_class_sections_router;
use crate::modules::courses::init_courses_router;
use crate::modules::departments::init_departments_router;
use crate::modules::grades::init_grades_router;
use crate::modules::lecturers::init_lecturers_router;
use crate::modules::registration_periods::init_registration_periods_router;
use crate::modules::registrations::init_registrations_router;
use crate::modules::reports::init_reports_router;
use crate::modules::schedules::init_schedules_router;
use crate::modules::students::init_students_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router(&state))
                .nest("/khoa", init_departments_router())
                .nest("/giangvien", init_lecturers_router())
                .nest("/sinhvien", init_students_router())
                .nest("/hocphan", init_courses_router())
                .nest("/dotdangky", init_registration_periods_router())
                .nest("/lophocphan", init_class_sections_router())
                .nest("/thoikhoabieu", init_schedules_router())
                .nest("/dangky", init_registrations_router())
                .nest("/diem", init_grades_router())
                .nest("/baocao", init_reports_router(&state)),
        )
        .with_state(state.clone())
        .layer(middleware::from_fn(metrics_middleware))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

/// Liveness plus a database round trip.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed to reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
