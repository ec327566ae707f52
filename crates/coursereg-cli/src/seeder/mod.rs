//! Fake data for development databases.
//!
//! Everything the seeder writes is tagged (codes prefixed with `SEED`,
//! emails under [`SEED_EMAIL_DOMAIN`], period names starting with `[seed]`)
//! so [`clear_all`] removes exactly that and nothing an administrator entered.

pub mod catalog;
pub mod models;
pub mod people;

use chrono::Utc;
use coursereg_auth::Role;
use coursereg_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

pub const SEED_PREFIX: &str = "SEED";
pub const SEED_EMAIL_DOMAIN: &str = "seed.coursereg.local";
/// Password of every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Seeds departments, lecturers, students, courses, an open registration
/// period and scheduled class sections.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database with {:?}\n", config);

    // bcrypt is slow; every seeded account shares one hash.
    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let departments = catalog::seed_departments(db, config.departments).await?;
    let lecturers = people::seed_people(
        db,
        &departments,
        config.lecturers_per_department,
        Role::Lecturer,
        &password_hash,
    )
    .await?;
    people::seed_people(
        db,
        &departments,
        config.students_per_department,
        Role::Student,
        &password_hash,
    )
    .await?;

    let courses = catalog::seed_courses(db, &departments, config.courses_per_department).await?;
    let period_id = catalog::seed_open_period(db).await?;

    let sections = catalog::generate_sections(
        &courses,
        |department_id| people::lecturers_by_department(&lecturers, department_id),
        config.sections_per_course,
        Utc::now().date_naive(),
    );
    catalog::seed_sections(db, &sections, period_id).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   All seeded accounts use the password `{}`", SEED_PASSWORD);

    Ok(())
}

/// Removes everything `seed_all` created.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧹 Clearing seeded data...");
    let mut tx = db.begin().await?;

    let code_pattern = format!("{}%", SEED_PREFIX);
    let email_pattern = format!("%@{}", SEED_EMAIL_DOMAIN);
    let period_pattern = format!("{}%", catalog::SEED_PERIOD_TAG);

    // Registrations, schedules and grades cascade from sections.
    let sections = sqlx::query("DELETE FROM class_sections WHERE code LIKE $1")
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let courses = sqlx::query("DELETE FROM courses WHERE code LIKE $1")
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let periods = sqlx::query("DELETE FROM registration_periods WHERE name LIKE $1")
        .bind(&period_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    // Lecturer and student profiles cascade from their accounts.
    let users = sqlx::query("DELETE FROM users WHERE email LIKE $1")
        .bind(&email_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let departments = sqlx::query("DELETE FROM departments WHERE code LIKE $1")
        .bind(&code_pattern)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!("   ✓ Removed {} class sections", sections);
    println!("   ✓ Removed {} courses", courses);
    println!("   ✓ Removed {} registration periods", periods);
    println!("   ✓ Removed {} user accounts", users);
    println!("   ✓ Removed {} departments", departments);
    println!("\n✅ Seeded data cleared");

    Ok(())
}
