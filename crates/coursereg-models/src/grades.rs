//! Grade (điểm) models.
//!
//! Component scores are entered by the lecturer; `total`, `letter`,
//! `classification` and `passed` are always derived server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassSectionId, GradeId, RegistrationId, RegistrationPeriodId, StudentId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Grade {
    pub id: GradeId,
    pub registration_id: RegistrationId,
    pub attendance: Option<f64>,
    pub midterm: Option<f64>,
    pub final_exam: Option<f64>,
    #[schema(example = 8.1)]
    pub total: f64,
    #[schema(example = "B")]
    pub letter: String,
    #[schema(example = "Khá")]
    pub classification: String,
    pub passed: bool,
    pub graded_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertGradeDto {
    pub registration_id: RegistrationId,
    #[validate(range(min = 0.0, max = 10.0, message = "Attendance must be between 0 and 10"))]
    pub attendance: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0, message = "Midterm must be between 0 and 10"))]
    pub midterm: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0, message = "Final exam must be between 0 and 10"))]
    pub final_exam: Option<f64>,
}

/// One row of a section's grade sheet; grade columns are empty until graded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradeSheetEntry {
    pub registration_id: RegistrationId,
    pub student_id: StudentId,
    pub student_code: String,
    pub student_name: String,
    pub attendance: Option<f64>,
    pub midterm: Option<f64>,
    pub final_exam: Option<f64>,
    pub total: Option<f64>,
    pub letter: Option<String>,
    pub classification: Option<String>,
    pub passed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeSheet {
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_name: String,
    pub entries: Vec<GradeSheetEntry>,
}

/// A grade as seen by the student who earned it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentGrade {
    pub registration_id: RegistrationId,
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub registration_period_id: RegistrationPeriodId,
    pub semester: String,
    pub attendance: Option<f64>,
    pub midterm: Option<f64>,
    pub final_exam: Option<f64>,
    pub total: Option<f64>,
    pub letter: Option<String>,
    pub classification: Option<String>,
    pub passed: Option<bool>,
}
