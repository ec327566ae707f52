use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::RegistrationId;

use crate::middleware::auth::{RequireAdmin, RequireStudent};
use crate::modules::registrations::model::{
    CreateRegistrationDto, MyRegistrationsQuery, PaginatedRegistrationsResponse,
    RegistrationDetails, RegistrationFilterParams,
};
use crate::modules::registrations::service::RegistrationService;
use crate::state::AppState;
use crate::utils::auth_helpers::current_student_id;
use crate::validator::ValidatedJson;

/// Register the calling student for a class section
#[utoipa::path(
    post,
    path = "/api/dangky",
    request_body = CreateRegistrationDto,
    responses(
        (status = 201, description = "Registered", body = RegistrationDetails),
        (status = 400, description = "Registration period is not open"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires SINHVIEN"),
        (status = 404, description = "Class section not found"),
        (status = 409, description = "Duplicate, full section, schedule conflict or same course")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<(StatusCode, Json<RegistrationDetails>), AppError> {
    let student_id = current_student_id(&state.db, &auth_user).await?;
    let registration = RegistrationService::register(&state.db, student_id, dto).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Cancel one of the calling student's registrations
#[utoipa::path(
    delete,
    path = "/api/dangky/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 204, description = "Registration cancelled"),
        (status = 400, description = "Period closed or grade already recorded"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the caller's registration"),
        (status = 404, description = "Registration not found")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn cancel_registration(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let student_id = current_student_id(&state.db, &auth_user).await?;
    RegistrationService::cancel(&state.db, student_id, RegistrationId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/dangky/me",
    params(MyRegistrationsQuery),
    responses(
        (status = 200, description = "Own registrations", body = Vec<RegistrationDetails>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires SINHVIEN")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_registrations(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(query): Query<MyRegistrationsQuery>,
) -> Result<Json<Vec<RegistrationDetails>>, AppError> {
    let student_id = current_student_id(&state.db, &auth_user).await?;
    let registrations =
        RegistrationService::get_student_registrations(&state.db, student_id, query).await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    get,
    path = "/api/dangky",
    params(RegistrationFilterParams),
    responses(
        (status = 200, description = "Registrations", body = PaginatedRegistrationsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_registrations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<RegistrationFilterParams>,
) -> Result<Json<PaginatedRegistrationsResponse>, AppError> {
    let registrations = RegistrationService::get_registrations(&state.db, filters).await?;
    Ok(Json(registrations))
}
