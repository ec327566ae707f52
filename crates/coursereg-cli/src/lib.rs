//! # Coursereg CLI
//!
//! Administrative helpers and database seeding for development and testing.
//!
//! ```ignore
//! use coursereg_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
