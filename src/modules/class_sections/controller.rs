use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::ClassSectionId;

use crate::middleware::auth::{AuthUser, RequireAdmin, RequireStaff};
use crate::modules::class_sections::model::{
    ClassSection, ClassSectionFilterParams, CreateClassSectionDto, PaginatedClassSectionsResponse,
    RosterEntry, UpdateClassSectionDto,
};
use crate::modules::class_sections::service::ClassSectionService;
use crate::state::AppState;
use crate::utils::auth_helpers::ensure_section_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/lophocphan",
    request_body = CreateClassSectionDto,
    responses(
        (status = 201, description = "Class section created", body = ClassSection),
        (status = 400, description = "Duplicate code or unknown course, lecturer or period"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_class_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateClassSectionDto>,
) -> Result<(StatusCode, Json<ClassSection>), AppError> {
    let section = ClassSectionService::create_class_section(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[utoipa::path(
    get,
    path = "/api/lophocphan",
    params(ClassSectionFilterParams),
    responses(
        (status = 200, description = "Class sections with enrolled counts", body = PaginatedClassSectionsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class_sections(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ClassSectionFilterParams>,
) -> Result<Json<PaginatedClassSectionsResponse>, AppError> {
    let sections = ClassSectionService::get_class_sections(&state.db, filters).await?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/lophocphan/{id}",
    params(("id" = Uuid, Path, description = "Class section ID")),
    responses(
        (status = 200, description = "Class section", body = ClassSection),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_class_section(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassSection>, AppError> {
    let section =
        ClassSectionService::get_class_section_by_id(&state.db, ClassSectionId::from(id)).await?;
    Ok(Json(section))
}

#[utoipa::path(
    put,
    path = "/api/lophocphan/{id}",
    params(("id" = Uuid, Path, description = "Class section ID")),
    request_body = UpdateClassSectionDto,
    responses(
        (status = 200, description = "Class section updated", body = ClassSection),
        (status = 400, description = "Capacity below current enrolment or duplicate code"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_class_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassSectionDto>,
) -> Result<Json<ClassSection>, AppError> {
    let section =
        ClassSectionService::update_class_section(&state.db, ClassSectionId::from(id), dto).await?;
    Ok(Json(section))
}

#[utoipa::path(
    delete,
    path = "/api/lophocphan/{id}",
    params(("id" = Uuid, Path, description = "Class section ID")),
    responses(
        (status = 204, description = "Class section deleted"),
        (status = 400, description = "Students are registered"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_class_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ClassSectionService::delete_class_section(&state.db, ClassSectionId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Students registered in a class section
#[utoipa::path(
    get,
    path = "/api/lophocphan/{id}/sinhvien",
    params(("id" = Uuid, Path, description = "Class section ID")),
    responses(
        (status = 200, description = "Roster", body = Vec<RosterEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the lecturer of this section"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Class Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_roster(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    let section_id = ClassSectionId::from(id);
    ensure_section_access(&state.db, &auth_user, section_id).await?;

    let roster = ClassSectionService::get_roster(&state.db, section_id).await?;
    Ok(Json(roster))
}
