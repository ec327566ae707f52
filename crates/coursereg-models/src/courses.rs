//! Course (học phần) models.

use chrono::{DateTime, Utc};
use coursereg_core::serde::{deserialize_optional_string, deserialize_optional_uuid};
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{CourseId, DepartmentId};

pub const MIN_CREDITS: i32 = 1;
pub const MAX_CREDITS: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    #[schema(example = "INT3306")]
    pub code: String,
    #[schema(example = "Phát triển ứng dụng Web")]
    pub name: String,
    #[schema(example = 3)]
    pub credits: i32,
    pub department_id: DepartmentId,
    pub department_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1, max = 10, message = "Credits must be between 1 and 10"))]
    pub credits: i32,
    pub department_id: DepartmentId,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Credits must be between 1 and 10"))]
    pub credits: Option<i32>,
    pub department_id: Option<DepartmentId>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CourseFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub department_id: Option<Uuid>,
    /// Matches code or name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(credits: i32) -> CreateCourseDto {
        CreateCourseDto {
            code: "INT3306".to_string(),
            name: "Phát triển ứng dụng Web".to_string(),
            credits,
            department_id: DepartmentId::new(),
            description: None,
        }
    }

    #[test]
    fn test_credits_bounds() {
        assert!(dto(MIN_CREDITS).validate().is_ok());
        assert!(dto(MAX_CREDITS).validate().is_ok());
        assert!(dto(0).validate().is_err());
        assert!(dto(11).validate().is_err());
    }

    #[test]
    fn test_update_credits_bounds() {
        let update = UpdateCourseDto {
            code: None,
            name: None,
            credits: Some(0),
            department_id: None,
            description: None,
        };
        assert!(update.validate().is_err());
    }
}
