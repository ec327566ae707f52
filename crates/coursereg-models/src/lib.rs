//! # Coursereg Models
//!
//! Domain entities, request/response DTOs and filter parameters shared by
//! the API server and the admin CLI.
//!
//! # Modules
//!
//! - [`ids`]: typed UUID keys
//! - [`auth`]: login, refresh and profile payloads
//! - [`users`]: login accounts
//! - [`departments`], [`lecturers`], [`students`], [`courses`]: the catalog
//! - [`registration_periods`], [`class_sections`], [`schedules`]: offerings
//! - [`registrations`], [`grades`]: enrolment and results
//! - [`reports`]: aggregated statistics

pub mod auth;
pub mod class_sections;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod ids;
pub mod lecturers;
pub mod registration_periods;
pub mod registrations;
pub mod reports;
pub mod schedules;
pub mod students;
pub mod users;

pub use auth::{
    ChangePasswordDto, Claims, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RefreshTokenClaims, RefreshTokenRequest,
};
pub use users::{User, UserCredentials};
