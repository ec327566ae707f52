//! Report payloads.

use coursereg_core::grading::LetterGrade;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{ClassSectionId, RegistrationPeriodId, StudentId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LetterCount {
    pub letter: LetterGrade,
    pub count: i64,
}

/// Grade distribution of one class section.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GradeDistribution {
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_name: String,
    pub enrolled_count: i64,
    pub graded_count: i64,
    /// Every letter, including those nobody received
    pub distribution: Vec<LetterCount>,
    pub average_total: Option<f64>,
    /// Percentage of graded students who passed, two decimals
    pub pass_rate: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SectionEnrollmentRow {
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_code: String,
    pub course_name: String,
    pub lecturer_name: Option<String>,
    pub capacity: i32,
    pub enrolled_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SectionEnrollment {
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_code: String,
    pub course_name: String,
    pub lecturer_name: Option<String>,
    pub capacity: i32,
    pub enrolled_count: i64,
    /// `enrolled / capacity` as a percentage, two decimals
    pub fill_rate: f64,
}

impl From<SectionEnrollmentRow> for SectionEnrollment {
    fn from(row: SectionEnrollmentRow) -> Self {
        let fill_rate = percentage(row.enrolled_count, i64::from(row.capacity));
        Self {
            class_section_id: row.class_section_id,
            class_section_code: row.class_section_code,
            course_code: row.course_code,
            course_name: row.course_name,
            lecturer_name: row.lecturer_name,
            capacity: row.capacity,
            enrolled_count: row.enrolled_count,
            fill_rate,
        }
    }
}

/// Enrollment statistics for a registration period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PeriodStatistics {
    pub registration_period_id: RegistrationPeriodId,
    pub registration_period_name: String,
    pub section_count: i64,
    pub total_capacity: i64,
    pub total_enrolled: i64,
    /// Distinct students with at least one registration
    pub student_count: i64,
    pub fill_rate: f64,
    pub sections: Vec<SectionEnrollment>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TranscriptRow {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: String,
    pub total: f64,
    pub letter: String,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptEntry {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: String,
    pub total: f64,
    pub letter: LetterGrade,
    pub grade_point: f64,
    pub passed: bool,
}

/// Bảng điểm: every graded course of a student with credit-weighted averages.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Transcript {
    pub student_id: StudentId,
    pub student_code: String,
    pub full_name: String,
    pub entries: Vec<TranscriptEntry>,
    pub credits_attempted: i64,
    pub credits_earned: i64,
    /// Credit-weighted mean of totals on the 10-point scale
    pub average_10: Option<f64>,
    /// Credit-weighted mean of grade points on the 4-point scale
    pub average_4: Option<f64>,
}

/// `part / whole` as a percentage rounded to two decimals; 0 when `whole` is 0.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 * 10000.0 / whole as f64).round() / 100.0
}
