use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::DepartmentId;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};
use crate::modules::departments::service::DepartmentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/khoa",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Duplicate code or name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/khoa",
    params(DepartmentFilterParams),
    responses(
        (status = 200, description = "Departments", body = PaginatedDepartmentsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<DepartmentFilterParams>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let departments = DepartmentService::get_departments(&state.db, filters).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    get,
    path = "/api/khoa/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department_by_id(&state.db, DepartmentId::from(id)).await?;
    Ok(Json(department))
}

#[utoipa::path(
    put,
    path = "/api/khoa/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Duplicate code or name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department =
        DepartmentService::update_department(&state.db, DepartmentId::from(id), dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/khoa/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 400, description = "Department is still referenced"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    DepartmentService::delete_department(&state.db, DepartmentId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
