//! Class section (lớp học phần) models.

use chrono::{DateTime, Utc};
use coursereg_core::serde::{deserialize_optional_string, deserialize_optional_uuid};
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{
    ClassSectionId, CourseId, LecturerId, RegistrationId, RegistrationPeriodId, StudentId,
};

/// A class section joined with its course, lecturer and period, plus the
/// number of students currently registered.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassSection {
    pub id: ClassSectionId,
    #[schema(example = "INT3306-01")]
    pub code: String,
    pub course_id: CourseId,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub lecturer_id: Option<LecturerId>,
    pub lecturer_name: Option<String>,
    pub registration_period_id: RegistrationPeriodId,
    pub registration_period_name: String,
    pub room: Option<String>,
    pub capacity: i32,
    pub enrolled_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassSection {
    pub fn is_full(&self) -> bool {
        self.enrolled_count >= i64::from(self.capacity)
    }

    pub fn remaining_seats(&self) -> i64 {
        (i64::from(self.capacity) - self.enrolled_count).max(0)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassSectionDto {
    #[validate(length(min = 1, max = 30))]
    pub code: String,
    pub course_id: CourseId,
    pub lecturer_id: Option<LecturerId>,
    pub registration_period_id: RegistrationPeriodId,
    #[validate(length(max = 50))]
    pub room: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassSectionDto {
    #[validate(length(min = 1, max = 30))]
    pub code: Option<String>,
    pub lecturer_id: Option<LecturerId>,
    #[validate(length(max = 50))]
    pub room: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000"))]
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ClassSectionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub course_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub lecturer_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub registration_period_id: Option<Uuid>,
    /// Matches section code, course code or course name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedClassSectionsResponse {
    pub data: Vec<ClassSection>,
    pub meta: PaginationMeta,
}

/// One student on a class section's roster.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RosterEntry {
    pub registration_id: RegistrationId,
    pub student_id: StudentId,
    pub student_code: String,
    pub full_name: String,
    pub email: String,
    pub cohort: Option<String>,
    pub registered_at: DateTime<Utc>,
}
