use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_auth::Role;
use coursereg_core::AppError;
use coursereg_models::ids::{ClassSectionId, RegistrationPeriodId, StudentId};

use crate::middleware::auth::{AuthUser, RequireStaff};
use crate::modules::reports::model::{GradeDistribution, PeriodStatistics, Transcript};
use crate::modules::reports::service::ReportService;
use crate::state::AppState;
use crate::utils::auth_helpers::{current_student_id, ensure_section_access};

/// Grade distribution of a class section
#[utoipa::path(
    get,
    path = "/api/baocao/lophocphan/{id}/phan-bo-diem",
    params(("id" = Uuid, Path, description = "Class section ID")),
    responses(
        (status = 200, description = "Count per letter, average total and pass rate", body = GradeDistribution),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the lecturer of this section"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grade_distribution(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<GradeDistribution>, AppError> {
    let section_id = ClassSectionId::from(id);
    ensure_section_access(&state.db, &auth_user, section_id).await?;

    let report = ReportService::grade_distribution(&state.db, section_id).await?;
    Ok(Json(report))
}

/// Enrollment statistics of a registration period
///
/// Mounted behind the `require_admin` route layer.
#[utoipa::path(
    get,
    path = "/api/baocao/dotdangky/{id}/thong-ke",
    params(("id" = Uuid, Path, description = "Registration period ID")),
    responses(
        (status = 200, description = "Per-section enrollment and fill rates", body = PeriodStatistics),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Registration period not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_period_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PeriodStatistics>, AppError> {
    let report =
        ReportService::period_statistics(&state.db, RegistrationPeriodId::from(id)).await?;
    Ok(Json(report))
}

/// Transcript of a student
///
/// Students may only request their own transcript.
#[utoipa::path(
    get,
    path = "/api/baocao/sinhvien/{id}/bang-diem",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Graded courses with credit-weighted averages", body = Transcript),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Another student's transcript"),
        (status = 404, description = "Student not found")
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_transcript(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Transcript>, AppError> {
    let student_id = StudentId::from(id);

    if !auth_user.has_any_role(&[Role::Admin, Role::Lecturer]) {
        let own_id = current_student_id(&state.db, &auth_user).await?;
        if own_id != student_id {
            return Err(AppError::forbidden(
                "Students may only view their own transcript".to_string(),
            ));
        }
    }

    let transcript = ReportService::transcript(&state.db, student_id).await?;
    Ok(Json(transcript))
}
