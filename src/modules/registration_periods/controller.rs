use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::RegistrationPeriodId;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::registration_periods::model::{
    CreateRegistrationPeriodDto, PaginatedRegistrationPeriodsResponse, RegistrationPeriod,
    RegistrationPeriodFilterParams, UpdateRegistrationPeriodDto,
};
use crate::modules::registration_periods::service::RegistrationPeriodService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/dotdangky",
    request_body = CreateRegistrationPeriodDto,
    responses(
        (status = 201, description = "Registration period created", body = RegistrationPeriod),
        (status = 400, description = "starts_at is not before ends_at"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_period(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationPeriodDto>,
) -> Result<(StatusCode, Json<RegistrationPeriod>), AppError> {
    let period = RegistrationPeriodService::create_period(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(period)))
}

#[utoipa::path(
    get,
    path = "/api/dotdangky",
    params(RegistrationPeriodFilterParams),
    responses(
        (status = 200, description = "Registration periods", body = PaginatedRegistrationPeriodsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_periods(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<RegistrationPeriodFilterParams>,
) -> Result<Json<PaginatedRegistrationPeriodsResponse>, AppError> {
    let periods = RegistrationPeriodService::get_periods(&state.db, filters).await?;
    Ok(Json(periods))
}

/// Periods accepting registrations right now
#[utoipa::path(
    get,
    path = "/api/dotdangky/open",
    responses(
        (status = 200, description = "Open registration periods", body = Vec<RegistrationPeriod>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_open_periods(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<RegistrationPeriod>>, AppError> {
    let periods = RegistrationPeriodService::get_open_periods(&state.db).await?;
    Ok(Json(periods))
}

#[utoipa::path(
    get,
    path = "/api/dotdangky/{id}",
    params(("id" = Uuid, Path, description = "Registration period ID")),
    responses(
        (status = 200, description = "Registration period", body = RegistrationPeriod),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Registration period not found")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_period(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationPeriod>, AppError> {
    let period =
        RegistrationPeriodService::get_period_by_id(&state.db, RegistrationPeriodId::from(id))
            .await?;
    Ok(Json(period))
}

#[utoipa::path(
    put,
    path = "/api/dotdangky/{id}",
    params(("id" = Uuid, Path, description = "Registration period ID")),
    request_body = UpdateRegistrationPeriodDto,
    responses(
        (status = 200, description = "Registration period updated", body = RegistrationPeriod),
        (status = 400, description = "starts_at is not before ends_at"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Registration period not found")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_period(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRegistrationPeriodDto>,
) -> Result<Json<RegistrationPeriod>, AppError> {
    let period =
        RegistrationPeriodService::update_period(&state.db, RegistrationPeriodId::from(id), dto)
            .await?;
    Ok(Json(period))
}

#[utoipa::path(
    delete,
    path = "/api/dotdangky/{id}",
    params(("id" = Uuid, Path, description = "Registration period ID")),
    responses(
        (status = 204, description = "Registration period deleted"),
        (status = 400, description = "Period still has class sections"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Registration period not found")
    ),
    tag = "Registration Periods",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_period(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    RegistrationPeriodService::delete_period(&state.db, RegistrationPeriodId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
