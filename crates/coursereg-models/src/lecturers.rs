//! Lecturer (giảng viên) models.
//!
//! A lecturer is a login account holding the `GIANGVIEN` role plus a profile
//! row in `lecturers`. Reads always join the account and department so the
//! client gets names rather than keys.

use chrono::{DateTime, Utc};
use coursereg_core::serde::{deserialize_optional_string, deserialize_optional_uuid};
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{DepartmentId, LecturerId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lecturer {
    pub id: LecturerId,
    pub user_id: UserId,
    #[schema(example = "GV001")]
    pub lecturer_code: String,
    pub full_name: String,
    pub email: String,
    pub department_id: DepartmentId,
    pub department_name: String,
    #[schema(example = "ThS.")]
    pub academic_title: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLecturerDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 20))]
    pub lecturer_code: String,
    pub department_id: DepartmentId,
    #[validate(length(max = 50))]
    pub academic_title: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLecturerDto {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    pub department_id: Option<DepartmentId>,
    #[validate(length(max = 50))]
    pub academic_title: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LecturerFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub department_id: Option<Uuid>,
    /// Matches code, name or email
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedLecturersResponse {
    pub data: Vec<Lecturer>,
    pub meta: PaginationMeta,
}
