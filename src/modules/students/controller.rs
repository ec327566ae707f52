use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use coursereg_core::AppError;
use coursereg_models::ids::StudentId;

use crate::middleware::auth::{RequireAdmin, RequireStudent};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::utils::auth_helpers::current_student_id;
use crate::validator::ValidatedJson;

/// Create a student account and profile
#[utoipa::path(
    post,
    path = "/api/sinhvien",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Email or student code already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 422, description = "Validation error")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/sinhvien",
    params(StudentFilterParams),
    responses(
        (status = 200, description = "Students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(&state.db, filters).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/sinhvien/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student_by_id(&state.db, StudentId::from(id)).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/sinhvien/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Department not found"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state.db, StudentId::from(id), dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/sinhvien/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student and account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires ADMIN"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StudentService::delete_student(&state.db, StudentId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The calling student's own profile
#[utoipa::path(
    get,
    path = "/api/sinhvien/me",
    responses(
        (status = 200, description = "Own student profile", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires SINHVIEN")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<Student>, AppError> {
    let student_id = current_student_id(&state.db, &auth_user).await?;
    let student = StudentService::get_student_by_id(&state.db, student_id).await?;
    Ok(Json(student))
}
