use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::ClassSectionId;

use crate::middleware::auth::{RequireStaff, RequireStudent};
use crate::modules::grades::model::{Grade, GradeSheet, StudentGrade, UpsertGradeDto};
use crate::modules::grades::service::GradeService;
use crate::state::AppState;
use crate::utils::auth_helpers::{current_student_id, ensure_section_access};
use crate::validator::ValidatedJson;

/// Record or replace a student's grade
///
/// Only the section's lecturer or an admin may grade. Total, letter,
/// classification and pass flag are computed from the components.
#[utoipa::path(
    put,
    path = "/api/diem",
    request_body = UpsertGradeDto,
    responses(
        (status = 200, description = "Grade saved", body = Grade),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the lecturer of this section"),
        (status = 404, description = "Registration not found"),
        (status = 422, description = "Score outside 0-10")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn upsert_grade(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<UpsertGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let section_id = GradeService::section_of_registration(&state.db, dto.registration_id).await?;
    ensure_section_access(&state.db, &auth_user, section_id).await?;

    let grade = GradeService::upsert_grade(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(grade))
}

#[utoipa::path(
    get,
    path = "/api/diem/lophocphan/{id}",
    params(("id" = Uuid, Path, description = "Class section ID")),
    responses(
        (status = 200, description = "Grade sheet", body = GradeSheet),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the lecturer of this section"),
        (status = 404, description = "Class section not found")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_grade_sheet(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<GradeSheet>, AppError> {
    let section_id = ClassSectionId::from(id);
    ensure_section_access(&state.db, &auth_user, section_id).await?;

    let sheet = GradeService::get_grade_sheet(&state.db, section_id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    get,
    path = "/api/diem/me",
    responses(
        (status = 200, description = "Own grades", body = Vec<StudentGrade>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires SINHVIEN")
    ),
    tag = "Grades",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_grades(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<Vec<StudentGrade>>, AppError> {
    let student_id = current_student_id(&state.db, &auth_user).await?;
    let grades = GradeService::get_student_grades(&state.db, student_id).await?;
    Ok(Json(grades))
}
