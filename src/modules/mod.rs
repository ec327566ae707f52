pub mod auth;
pub mod class_sections;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod lecturers;
pub mod registration_periods;
pub mod registrations;
pub mod reports;
pub mod schedules;
pub mod students;
