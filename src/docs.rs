use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use coursereg_auth::Role;
use coursereg_core::grading::LetterGrade;
use coursereg_core::{PaginationMeta, PaginationParams};
use coursereg_models::auth::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RefreshTokenRequest,
};
use coursereg_models::class_sections::{
    ClassSection, ClassSectionFilterParams, CreateClassSectionDto, PaginatedClassSectionsResponse,
    RosterEntry, UpdateClassSectionDto,
};
use coursereg_models::courses::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
use coursereg_models::departments::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};
use coursereg_models::grades::{Grade, GradeSheet, GradeSheetEntry, StudentGrade, UpsertGradeDto};
use coursereg_models::lecturers::{
    CreateLecturerDto, Lecturer, LecturerFilterParams, PaginatedLecturersResponse,
    UpdateLecturerDto,
};
use coursereg_models::registration_periods::{
    CreateRegistrationPeriodDto, PaginatedRegistrationPeriodsResponse, RegistrationPeriod,
    RegistrationPeriodFilterParams, UpdateRegistrationPeriodDto,
};
use coursereg_models::registrations::{
    CreateRegistrationDto, MyRegistrationsQuery, PaginatedRegistrationsResponse, Registration,
    RegistrationDetails, RegistrationFilterParams,
};
use coursereg_models::reports::{
    GradeDistribution, LetterCount, PeriodStatistics, SectionEnrollment, Transcript,
    TranscriptEntry,
};
use coursereg_models::schedules::{
    CalendarEvent, CalendarQuery, CalendarResponse, CalendarWeek, CreateScheduleDto, Schedule,
    ScheduleFilterParams, UpdateScheduleDto,
};
use coursereg_models::students::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::me,
        crate::modules::auth::controller::change_password,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::lecturers::controller::create_lecturer,
        crate::modules::lecturers::controller::get_lecturers,
        crate::modules::lecturers::controller::get_lecturer,
        crate::modules::lecturers::controller::update_lecturer,
        crate::modules::lecturers::controller::delete_lecturer,
        crate::modules::lecturers::controller::get_my_class_sections,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::get_me,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::registration_periods::controller::create_period,
        crate::modules::registration_periods::controller::get_periods,
        crate::modules::registration_periods::controller::get_open_periods,
        crate::modules::registration_periods::controller::get_period,
        crate::modules::registration_periods::controller::update_period,
        crate::modules::registration_periods::controller::delete_period,
        crate::modules::class_sections::controller::create_class_section,
        crate::modules::class_sections::controller::get_class_sections,
        crate::modules::class_sections::controller::get_class_section,
        crate::modules::class_sections::controller::update_class_section,
        crate::modules::class_sections::controller::delete_class_section,
        crate::modules::class_sections::controller::get_roster,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::get_schedules,
        crate::modules::schedules::controller::get_calendar,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::registrations::controller::register,
        crate::modules::registrations::controller::cancel_registration,
        crate::modules::registrations::controller::get_my_registrations,
        crate::modules::registrations::controller::get_registrations,
        crate::modules::grades::controller::upsert_grade,
        crate::modules::grades::controller::get_grade_sheet,
        crate::modules::grades::controller::get_my_grades,
        crate::modules::reports::controller::get_grade_distribution,
        crate::modules::reports::controller::get_period_statistics,
        crate::modules::reports::controller::get_transcript,
    ),
    components(
        schemas(
            Role,
            LetterGrade,
            PaginationMeta,
            PaginationParams,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            ChangePasswordDto,
            ProfileResponse,
            MessageResponse,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            DepartmentFilterParams,
            PaginatedDepartmentsResponse,
            Lecturer,
            CreateLecturerDto,
            UpdateLecturerDto,
            LecturerFilterParams,
            PaginatedLecturersResponse,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            StudentFilterParams,
            PaginatedStudentsResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            CourseFilterParams,
            PaginatedCoursesResponse,
            RegistrationPeriod,
            CreateRegistrationPeriodDto,
            UpdateRegistrationPeriodDto,
            RegistrationPeriodFilterParams,
            PaginatedRegistrationPeriodsResponse,
            ClassSection,
            CreateClassSectionDto,
            UpdateClassSectionDto,
            ClassSectionFilterParams,
            PaginatedClassSectionsResponse,
            RosterEntry,
            Schedule,
            CreateScheduleDto,
            UpdateScheduleDto,
            ScheduleFilterParams,
            CalendarQuery,
            CalendarEvent,
            CalendarWeek,
            CalendarResponse,
            Registration,
            RegistrationDetails,
            CreateRegistrationDto,
            RegistrationFilterParams,
            MyRegistrationsQuery,
            PaginatedRegistrationsResponse,
            Grade,
            UpsertGradeDto,
            GradeSheet,
            GradeSheetEntry,
            StudentGrade,
            LetterCount,
            GradeDistribution,
            SectionEnrollment,
            PeriodStatistics,
            TranscriptEntry,
            Transcript,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh and password management"),
        (name = "Departments", description = "Department (khoa) management"),
        (name = "Lecturers", description = "Lecturer (giang vien) management"),
        (name = "Students", description = "Student (sinh vien) management"),
        (name = "Courses", description = "Course (hoc phan) catalog"),
        (name = "Registration Periods", description = "Registration windows (dot dang ky)"),
        (name = "Class Sections", description = "Class sections (lop hoc phan) and rosters"),
        (name = "Schedules", description = "Weekly sessions and personal calendars"),
        (name = "Registrations", description = "Enrolment and cancellation"),
        (name = "Grades", description = "Grade entry and grade sheets"),
        (name = "Reports", description = "Grade distributions, enrolment statistics and transcripts")
    ),
    info(
        title = "Coursereg API",
        version = "0.1.0",
        description = "Course registration backend built with Rust, Axum and PostgreSQL, secured with JWT bearer tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
