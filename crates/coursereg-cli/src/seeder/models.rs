//! Seed records and seeding configuration.

use chrono::NaiveDate;
use coursereg_auth::Role;
use coursereg_models::ids::{CourseId, DepartmentId, LecturerId};

pub struct DepartmentSeed {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// A login account plus the profile row it owns.
pub struct PersonSeed {
    pub full_name: String,
    pub email: String,
    pub code: String,
    pub role: Role,
    pub department_id: DepartmentId,
    /// Academic title for lecturers, cohort for students
    pub detail: Option<String>,
}

pub struct CourseSeed {
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub department_id: DepartmentId,
}

pub struct SectionSeed {
    pub code: String,
    pub course_id: CourseId,
    pub lecturer_id: Option<LecturerId>,
    pub room: String,
    pub capacity: i32,
    pub weekday: i16,
    pub start_period: i16,
    pub period_count: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// How much data `seed_all` generates.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub departments: usize,
    pub courses_per_department: usize,
    pub lecturers_per_department: usize,
    pub students_per_department: usize,
    pub sections_per_course: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            departments: 4,
            courses_per_department: 6,
            lecturers_per_department: 4,
            students_per_department: 50,
            sections_per_course: 2,
        }
    }
}
