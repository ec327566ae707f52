//! Registration (đăng ký) models.

use chrono::{DateTime, Utc};
use coursereg_core::serde::deserialize_optional_uuid;
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{ClassSectionId, CourseId, RegistrationId, RegistrationPeriodId, StudentId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub class_section_id: ClassSectionId,
    pub registered_at: DateTime<Utc>,
}

/// A registration joined with the student, section and course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RegistrationDetails {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub student_code: String,
    pub student_name: String,
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_id: CourseId,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub registration_period_id: RegistrationPeriodId,
    pub registration_period_name: String,
    pub room: Option<String>,
    pub lecturer_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    pub class_section_id: ClassSectionId,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RegistrationFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_section_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub registration_period_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedRegistrationsResponse {
    pub data: Vec<RegistrationDetails>,
    pub meta: PaginationMeta,
}

/// Query for the caller's own registrations.
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct MyRegistrationsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub registration_period_id: Option<Uuid>,
}
