//! Course registration.
//!
//! Registering locks the student row and then the class-section row
//! (`SELECT ... FOR UPDATE`) before any rule is checked. Two students racing
//! for the last seat are serialized on the section, and concurrent requests
//! from one student are serialized on the student, so the per-student rules
//! below always see the other request's committed registration.
//!
//! Rules, in order:
//! 1. the section's registration period is open
//! 2. the student is not already registered in the section
//! 3. the section has a free seat
//! 4. no weekly session clashes with the student's other sections in the
//!    same period
//! 5. no other section of the same course in the same period

use sqlx::{FromRow, PgPool};
use tracing::instrument;

use coursereg_core::timetable::date_ranges_overlap;
use coursereg_core::{AppError, PaginationMeta};
use coursereg_models::ids::{
    ClassSectionId, CourseId, RegistrationId, RegistrationPeriodId, StudentId,
};
use coursereg_models::schedules::SessionWithSection;

use crate::metrics::track_registration;
use crate::modules::registrations::model::{
    CreateRegistrationDto, MyRegistrationsQuery, PaginatedRegistrationsResponse,
    RegistrationDetails, RegistrationFilterParams,
};
use crate::modules::schedules::service::SESSION_SELECT;

const REGISTRATION_SELECT: &str = r#"SELECT r.id, r.student_id, s.student_code,
       su.full_name AS student_name, r.class_section_id, cs.code AS class_section_code,
       cs.course_id, c.code AS course_code, c.name AS course_name, c.credits,
       cs.registration_period_id, rp.name AS registration_period_name,
       cs.room, lu.full_name AS lecturer_name, r.registered_at
FROM registrations r
JOIN students s ON s.id = r.student_id
JOIN users su ON su.id = s.user_id
JOIN class_sections cs ON cs.id = r.class_section_id
JOIN courses c ON c.id = cs.course_id
JOIN registration_periods rp ON rp.id = cs.registration_period_id
LEFT JOIN lecturers l ON l.id = cs.lecturer_id
LEFT JOIN users lu ON lu.id = l.user_id"#;

#[derive(Debug, FromRow)]
struct LockedSection {
    id: ClassSectionId,
    course_id: CourseId,
    registration_period_id: RegistrationPeriodId,
    capacity: i32,
    period_open: bool,
}

#[derive(Debug, FromRow)]
struct CancellableRegistration {
    student_id: StudentId,
    period_open: bool,
    graded: bool,
}

/// First existing session that clashes with one of the requested sessions:
/// same weekday, intersecting periods and overlapping teaching dates.
pub fn find_schedule_conflict<'a>(
    requested: &[SessionWithSection],
    existing: &'a [SessionWithSection],
) -> Option<&'a SessionWithSection> {
    existing.iter().find(|taken| {
        requested.iter().any(|wanted| {
            wanted.slot().overlaps(&taken.slot())
                && date_ranges_overlap(
                    wanted.start_date,
                    wanted.end_date,
                    taken.start_date,
                    taken.end_date,
                )
        })
    })
}

pub struct RegistrationService;

impl RegistrationService {
    #[instrument(skip(db))]
    pub async fn register(
        db: &PgPool,
        student_id: StudentId,
        dto: CreateRegistrationDto,
    ) -> Result<RegistrationDetails, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT 1 FROM students WHERE id = $1 FOR UPDATE")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let section = sqlx::query_as::<_, LockedSection>(
            r#"SELECT cs.id, cs.course_id, cs.registration_period_id, cs.capacity,
                      (rp.starts_at <= NOW() AND NOW() < rp.ends_at) AS period_open
               FROM class_sections cs
               JOIN registration_periods rp ON rp.id = cs.registration_period_id
               WHERE cs.id = $1
               FOR UPDATE OF cs"#,
        )
        .bind(dto.class_section_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        if !section.period_open {
            track_registration("period_closed");
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Registration period is not open"
            )));
        }

        let already_registered = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE student_id = $1 AND class_section_id = $2)",
        )
        .bind(student_id)
        .bind(section.id)
        .fetch_one(&mut *tx)
        .await?;

        if already_registered {
            track_registration("duplicate");
            return Err(AppError::conflict(anyhow::anyhow!(
                "Already registered for this class section"
            )));
        }

        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE class_section_id = $1",
        )
        .bind(section.id)
        .fetch_one(&mut *tx)
        .await?;

        if enrolled >= i64::from(section.capacity) {
            track_registration("full");
            return Err(AppError::conflict(anyhow::anyhow!("Class section is full")));
        }

        let requested = sqlx::query_as::<_, SessionWithSection>(&format!(
            "{} WHERE sc.class_section_id = $1",
            SESSION_SELECT
        ))
        .bind(section.id)
        .fetch_all(&mut *tx)
        .await?;

        let existing = sqlx::query_as::<_, SessionWithSection>(&format!(
            r#"{} JOIN registrations r ON r.class_section_id = cs.id
               WHERE r.student_id = $1 AND cs.registration_period_id = $2"#,
            SESSION_SELECT
        ))
        .bind(student_id)
        .bind(section.registration_period_id)
        .fetch_all(&mut *tx)
        .await?;

        if let Some(clash) = find_schedule_conflict(&requested, &existing) {
            track_registration("schedule_conflict");
            return Err(AppError::conflict(anyhow::anyhow!(
                "Schedule conflicts with class section {} ({})",
                clash.class_section_code,
                clash.course_name
            )));
        }

        let same_course = sqlx::query_scalar::<_, String>(
            r#"SELECT cs.code FROM registrations r
               JOIN class_sections cs ON cs.id = r.class_section_id
               WHERE r.student_id = $1 AND cs.course_id = $2 AND cs.registration_period_id = $3
               LIMIT 1"#,
        )
        .bind(student_id)
        .bind(section.course_id)
        .bind(section.registration_period_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(code) = same_course {
            track_registration("same_course");
            return Err(AppError::conflict(anyhow::anyhow!(
                "Already registered for class section {} of the same course",
                code
            )));
        }

        let registration_id = sqlx::query_scalar::<_, RegistrationId>(
            "INSERT INTO registrations (student_id, class_section_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(student_id)
        .bind(section.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "Already registered for this class section"
                ));
            }
            AppError::from(e)
        })?;

        tx.commit().await?;
        track_registration("success");
        tracing::info!(%registration_id, class_section_id = %section.id, "student registered");

        Self::get_registration_by_id(db, registration_id).await
    }

    /// Cancels one of the student's own registrations while its period is
    /// still open and no grade has been recorded.
    #[instrument(skip(db))]
    pub async fn cancel(
        db: &PgPool,
        student_id: StudentId,
        registration_id: RegistrationId,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let registration = sqlx::query_as::<_, CancellableRegistration>(
            r#"SELECT r.student_id,
                      (rp.starts_at <= NOW() AND NOW() < rp.ends_at) AS period_open,
                      EXISTS(SELECT 1 FROM grades g WHERE g.registration_id = r.id) AS graded
               FROM registrations r
               JOIN class_sections cs ON cs.id = r.class_section_id
               JOIN registration_periods rp ON rp.id = cs.registration_period_id
               WHERE r.id = $1
               FOR UPDATE OF r"#,
        )
        .bind(registration_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))?;

        if registration.student_id != student_id {
            return Err(AppError::forbidden(
                "You can only cancel your own registrations".to_string(),
            ));
        }

        if !registration.period_open {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Registration period is closed"
            )));
        }

        if registration.graded {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A grade has already been recorded for this registration"
            )));
        }

        sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(registration_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        track_registration("cancelled");

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_registration_by_id(
        db: &PgPool,
        id: RegistrationId,
    ) -> Result<RegistrationDetails, AppError> {
        sqlx::query_as::<_, RegistrationDetails>(&format!("{} WHERE r.id = $1", REGISTRATION_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_student_registrations(
        db: &PgPool,
        student_id: StudentId,
        query: MyRegistrationsQuery,
    ) -> Result<Vec<RegistrationDetails>, AppError> {
        let registrations = sqlx::query_as::<_, RegistrationDetails>(&format!(
            r#"{} WHERE r.student_id = $1
                 AND ($2::uuid IS NULL OR cs.registration_period_id = $2)
               ORDER BY rp.starts_at DESC, c.code"#,
            REGISTRATION_SELECT
        ))
        .bind(student_id)
        .bind(query.registration_period_id)
        .fetch_all(db)
        .await?;

        Ok(registrations)
    }

    #[instrument(skip(db))]
    pub async fn get_registrations(
        db: &PgPool,
        filters: RegistrationFilterParams,
    ) -> Result<PaginatedRegistrationsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let where_clause = r#"WHERE ($1::uuid IS NULL OR r.class_section_id = $1)
              AND ($2::uuid IS NULL OR r.student_id = $2)
              AND ($3::uuid IS NULL OR cs.registration_period_id = $3)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*) FROM registrations r
               JOIN class_sections cs ON cs.id = r.class_section_id {}"#,
            where_clause
        ))
        .bind(filters.class_section_id)
        .bind(filters.student_id)
        .bind(filters.registration_period_id)
        .fetch_one(db)
        .await?;

        let registrations = sqlx::query_as::<_, RegistrationDetails>(&format!(
            "{} {} ORDER BY r.registered_at DESC LIMIT $4 OFFSET $5",
            REGISTRATION_SELECT, where_clause
        ))
        .bind(filters.class_section_id)
        .bind(filters.student_id)
        .bind(filters.registration_period_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedRegistrationsResponse {
            data: registrations,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }
}
