//! # Coursereg Core
//!
//! Core types, errors, and pure domain utilities for the course registration API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Lenient deserializers for query strings
//! - [`grading`]: Weighted grade totals, letter bands and GPA helpers
//! - [`timetable`]: Teaching period to wall-clock mapping and weekly calendars
//!
//! # Example
//!
//! ```ignore
//! use coursereg_core::grading::GradeSummary;
//! use coursereg_core::timetable::period_start_time;
//!
//! let summary = GradeSummary::compute(Some(9.0), Some(7.5), Some(8.0))?;
//! assert_eq!(summary.total, 8.1);
//!
//! let start = period_start_time(1); // 07:00
//! ```

pub mod errors;
pub mod grading;
pub mod pagination;
pub mod password;
pub mod serde;
pub mod timetable;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
