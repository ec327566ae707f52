use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::class_sections::ClassSection;
use coursereg_models::ids::LecturerId;

use crate::middleware::auth::{AuthUser, RequireAdmin, RequireLecturer};
use crate::modules::class_sections::service::ClassSectionService;
use crate::modules::lecturers::model::{
    CreateLecturerDto, Lecturer, LecturerFilterParams, PaginatedLecturersResponse,
    UpdateLecturerDto,
};
use crate::modules::lecturers::service::LecturerService;
use crate::state::AppState;
use crate::utils::auth_helpers::current_lecturer_id;
use crate::validator::ValidatedJson;

/// Create a lecturer account and profile
#[utoipa::path(
    post,
    path = "/api/giangvien",
    request_body = CreateLecturerDto,
    responses(
        (status = 201, description = "Lecturer created", body = Lecturer),
        (status = 400, description = "Email or lecturer code already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_lecturer(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateLecturerDto>,
) -> Result<(StatusCode, Json<Lecturer>), AppError> {
    let lecturer = LecturerService::create_lecturer(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(lecturer)))
}

#[utoipa::path(
    get,
    path = "/api/giangvien",
    params(LecturerFilterParams),
    responses(
        (status = 200, description = "Lecturers", body = PaginatedLecturersResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lecturers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<LecturerFilterParams>,
) -> Result<Json<PaginatedLecturersResponse>, AppError> {
    let lecturers = LecturerService::get_lecturers(&state.db, filters).await?;
    Ok(Json(lecturers))
}

#[utoipa::path(
    get,
    path = "/api/giangvien/{id}",
    params(("id" = Uuid, Path, description = "Lecturer ID")),
    responses(
        (status = 200, description = "Lecturer", body = Lecturer),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lecturer not found")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_lecturer(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Lecturer>, AppError> {
    let lecturer = LecturerService::get_lecturer_by_id(&state.db, LecturerId::from(id)).await?;
    Ok(Json(lecturer))
}

#[utoipa::path(
    put,
    path = "/api/giangvien/{id}",
    params(("id" = Uuid, Path, description = "Lecturer ID")),
    request_body = UpdateLecturerDto,
    responses(
        (status = 200, description = "Lecturer updated", body = Lecturer),
        (status = 400, description = "Department not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Lecturer not found")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_lecturer(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLecturerDto>,
) -> Result<Json<Lecturer>, AppError> {
    let lecturer = LecturerService::update_lecturer(&state.db, LecturerId::from(id), dto).await?;
    Ok(Json(lecturer))
}

#[utoipa::path(
    delete,
    path = "/api/giangvien/{id}",
    params(("id" = Uuid, Path, description = "Lecturer ID")),
    responses(
        (status = 204, description = "Lecturer and account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Lecturer not found")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_lecturer(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LecturerService::delete_lecturer(&state.db, LecturerId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Class sections taught by the calling lecturer
#[utoipa::path(
    get,
    path = "/api/giangvien/me/lophocphan",
    responses(
        (status = 200, description = "Own class sections", body = Vec<ClassSection>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires GIANGVIEN")
    ),
    tag = "Lecturers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_class_sections(
    State(state): State<AppState>,
    RequireLecturer(auth_user): RequireLecturer,
) -> Result<Json<Vec<ClassSection>>, AppError> {
    let lecturer_id = current_lecturer_id(&state.db, &auth_user).await?;
    let sections = ClassSectionService::get_sections_for_lecturer(&state.db, lecturer_id).await?;
    Ok(Json(sections))
}
