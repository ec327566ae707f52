//! Student (sinh viên) models.

use chrono::{DateTime, NaiveDate, Utc};
use coursereg_core::serde::{deserialize_optional_string, deserialize_optional_uuid};
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{DepartmentId, StudentId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    #[schema(example = "SV2026001")]
    pub student_code: String,
    pub full_name: String,
    pub email: String,
    pub department_id: DepartmentId,
    pub department_name: String,
    /// Intake, e.g. `K66`
    pub cohort: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20))]
    pub student_code: String,
    pub department_id: DepartmentId,
    #[validate(length(max = 20))]
    pub cohort: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    pub department_id: Option<DepartmentId>,
    #[validate(length(max = 20))]
    pub cohort: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub department_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cohort: Option<String>,
    /// Matches code, name or email
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
