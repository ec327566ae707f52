use sqlx::{FromRow, PgPool};
use tracing::instrument;

use coursereg_core::AppError;
use coursereg_core::grading::GradeSummary;
use coursereg_models::ids::{ClassSectionId, RegistrationId, StudentId, UserId};

use crate::metrics::track_grade_recorded;
use crate::modules::grades::model::{
    Grade, GradeSheet, GradeSheetEntry, StudentGrade, UpsertGradeDto,
};

#[derive(Debug, Default, FromRow)]
struct StoredComponents {
    attendance: Option<f64>,
    midterm: Option<f64>,
    final_exam: Option<f64>,
}

#[derive(Debug, FromRow)]
struct SectionHeader {
    code: String,
    course_name: String,
}

pub struct GradeService;

impl GradeService {
    /// Class section a registration belongs to.
    #[instrument(skip(db))]
    pub async fn section_of_registration(
        db: &PgPool,
        registration_id: RegistrationId,
    ) -> Result<ClassSectionId, AppError> {
        sqlx::query_scalar::<_, ClassSectionId>(
            "SELECT class_section_id FROM registrations WHERE id = $1",
        )
        .bind(registration_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))
    }

    /// Inserts or updates the grade of a registration. Components missing
    /// from the request keep their stored value; the total, letter,
    /// classification and pass flag are recomputed from the merged scores.
    #[instrument(skip(db))]
    pub async fn upsert_grade(
        db: &PgPool,
        graded_by: UserId,
        dto: UpsertGradeDto,
    ) -> Result<Grade, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT 1 FROM registrations WHERE id = $1 FOR UPDATE")
            .bind(dto.registration_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))?;

        let stored = sqlx::query_as::<_, StoredComponents>(
            "SELECT attendance, midterm, final_exam FROM grades WHERE registration_id = $1",
        )
        .bind(dto.registration_id)
        .fetch_optional(&mut *tx)
        .await?
        .unwrap_or_default();

        let attendance = dto.attendance.or(stored.attendance);
        let midterm = dto.midterm.or(stored.midterm);
        let final_exam = dto.final_exam.or(stored.final_exam);

        let summary = GradeSummary::compute(attendance, midterm, final_exam)
            .map_err(AppError::unprocessable)?;

        let grade = sqlx::query_as::<_, Grade>(
            r#"INSERT INTO grades (registration_id, attendance, midterm, final_exam,
                                   total, letter, classification, passed, graded_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (registration_id) DO UPDATE
               SET attendance = EXCLUDED.attendance,
                   midterm = EXCLUDED.midterm,
                   final_exam = EXCLUDED.final_exam,
                   total = EXCLUDED.total,
                   letter = EXCLUDED.letter,
                   classification = EXCLUDED.classification,
                   passed = EXCLUDED.passed,
                   graded_by = EXCLUDED.graded_by,
                   updated_at = NOW()
               RETURNING id, registration_id, attendance, midterm, final_exam, total,
                         letter, classification, passed, graded_by, created_at, updated_at"#,
        )
        .bind(dto.registration_id)
        .bind(attendance)
        .bind(midterm)
        .bind(final_exam)
        .bind(summary.total)
        .bind(summary.letter.as_str())
        .bind(summary.classification)
        .bind(summary.passed)
        .bind(graded_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        track_grade_recorded(summary.letter);
        tracing::info!(
            registration_id = %grade.registration_id,
            total = grade.total,
            letter = %grade.letter,
            "grade recorded"
        );

        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn get_grade_sheet(
        db: &PgPool,
        section_id: ClassSectionId,
    ) -> Result<GradeSheet, AppError> {
        let header = sqlx::query_as::<_, SectionHeader>(
            r#"SELECT cs.code, c.name AS course_name
               FROM class_sections cs
               JOIN courses c ON c.id = cs.course_id
               WHERE cs.id = $1"#,
        )
        .bind(section_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        let entries = sqlx::query_as::<_, GradeSheetEntry>(
            r#"SELECT r.id AS registration_id, s.id AS student_id, s.student_code,
                      u.full_name AS student_name, g.attendance, g.midterm, g.final_exam,
                      g.total, g.letter, g.classification, g.passed
               FROM registrations r
               JOIN students s ON s.id = r.student_id
               JOIN users u ON u.id = s.user_id
               LEFT JOIN grades g ON g.registration_id = r.id
               WHERE r.class_section_id = $1
               ORDER BY s.student_code"#,
        )
        .bind(section_id)
        .fetch_all(db)
        .await?;

        Ok(GradeSheet {
            class_section_id: section_id,
            class_section_code: header.code,
            course_name: header.course_name,
            entries,
        })
    }

    /// Every registration of a student with its grade, if any.
    #[instrument(skip(db))]
    pub async fn get_student_grades(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<Vec<StudentGrade>, AppError> {
        let grades = sqlx::query_as::<_, StudentGrade>(
            r#"SELECT r.id AS registration_id, cs.id AS class_section_id,
                      cs.code AS class_section_code, c.code AS course_code,
                      c.name AS course_name, c.credits, rp.id AS registration_period_id,
                      rp.semester, g.attendance, g.midterm, g.final_exam, g.total,
                      g.letter, g.classification, g.passed
               FROM registrations r
               JOIN class_sections cs ON cs.id = r.class_section_id
               JOIN courses c ON c.id = cs.course_id
               JOIN registration_periods rp ON rp.id = cs.registration_period_id
               LEFT JOIN grades g ON g.registration_id = r.id
               WHERE r.student_id = $1
               ORDER BY rp.starts_at DESC, c.code"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(grades)
    }
}
