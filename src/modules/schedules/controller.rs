use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use coursereg_auth::Role;
use coursereg_core::AppError;
use coursereg_models::ids::ScheduleId;

use crate::middleware::auth::{AuthUser, RequireAdmin};
use crate::modules::schedules::model::{
    CalendarQuery, CalendarResponse, CreateScheduleDto, Schedule, ScheduleFilterParams,
    UpdateScheduleDto,
};
use crate::modules::schedules::service::{CalendarOwner, ScheduleService};
use crate::state::AppState;
use crate::utils::auth_helpers::{current_lecturer_id, current_student_id};
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/thoikhoabieu",
    request_body = CreateScheduleDto,
    responses(
        (status = 201, description = "Session created", body = Schedule),
        (status = 400, description = "Invalid slot, dates or class section"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_schedule(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let schedule = ScheduleService::create_schedule(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    get,
    path = "/api/thoikhoabieu",
    params(ScheduleFilterParams),
    responses(
        (status = 200, description = "Weekly sessions", body = Vec<Schedule>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schedules(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ScheduleFilterParams>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = ScheduleService::get_schedules(&state.db, filters).await?;
    Ok(Json(schedules))
}

/// The caller's dated sessions grouped by week
///
/// Students see the sections they registered for, lecturers the sections
/// they teach. Without `from`/`to` the current week is returned.
#[utoipa::path(
    get,
    path = "/api/thoikhoabieu/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar", body = CalendarResponse),
        (status = 400, description = "Invalid or too long range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is neither a student nor a lecturer")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_calendar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let owner = if auth_user.has_role(Role::Student) {
        CalendarOwner::Student(current_student_id(&state.db, &auth_user).await?)
    } else if auth_user.has_role(Role::Lecturer) {
        CalendarOwner::Lecturer(current_lecturer_id(&state.db, &auth_user).await?)
    } else {
        return Err(AppError::forbidden(
            "Calendar is only available to students and lecturers".to_string(),
        ));
    };

    let today = Utc::now().date_naive();
    let calendar = ScheduleService::get_calendar(&state.db, owner, query, today).await?;
    Ok(Json(calendar))
}

#[utoipa::path(
    get,
    path = "/api/thoikhoabieu/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Session", body = Schedule),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_schedule(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::get_schedule_by_id(&state.db, ScheduleId::from(id)).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    put,
    path = "/api/thoikhoabieu/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Session updated", body = Schedule),
        (status = 400, description = "Invalid slot or dates"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_schedule(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::update_schedule(&state.db, ScheduleId::from(id), dto).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/thoikhoabieu/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Schedule not found")
    ),
    tag = "Schedules",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ScheduleService::delete_schedule(&state.db, ScheduleId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
