use sqlx::{FromRow, PgPool};
use tracing::instrument;

use coursereg_core::AppError;
use coursereg_core::grading::{LetterGrade, weighted_average};
use coursereg_models::ids::{ClassSectionId, RegistrationPeriodId, StudentId};

use crate::modules::reports::model::{
    GradeDistribution, LetterCount, PeriodStatistics, SectionEnrollment, SectionEnrollmentRow,
    Transcript, TranscriptEntry, TranscriptRow, percentage,
};

#[derive(Debug, FromRow)]
struct SectionSummary {
    code: String,
    course_name: String,
    enrolled_count: i64,
}

#[derive(Debug, FromRow)]
struct GradedRow {
    total: f64,
    letter: String,
    passed: bool,
}

#[derive(Debug, FromRow)]
struct StudentHeader {
    student_code: String,
    full_name: String,
}

fn letter_of(letter: &str, total: f64) -> LetterGrade {
    LetterGrade::parse(letter).unwrap_or_else(|| LetterGrade::from_total(total))
}

/// Count per letter (all five, in order), mean total and pass rate.
fn summarize_grades(rows: &[GradedRow]) -> (Vec<LetterCount>, Option<f64>, Option<f64>) {
    let distribution = LetterGrade::ALL
        .iter()
        .map(|&letter| LetterCount {
            letter,
            count: rows
                .iter()
                .filter(|row| letter_of(&row.letter, row.total) == letter)
                .count() as i64,
        })
        .collect();

    if rows.is_empty() {
        return (distribution, None, None);
    }

    let graded = rows.len() as i64;
    let sum: f64 = rows.iter().map(|row| row.total).sum();
    let average = ((sum / graded as f64) * 100.0).round() / 100.0;
    let passed = rows.iter().filter(|row| row.passed).count() as i64;

    (distribution, Some(average), Some(percentage(passed, graded)))
}

fn build_transcript(
    student_id: StudentId,
    header: StudentHeader,
    rows: Vec<TranscriptRow>,
) -> Transcript {
    let entries: Vec<TranscriptEntry> = rows
        .into_iter()
        .map(|row| {
            let letter = letter_of(&row.letter, row.total);
            TranscriptEntry {
                course_code: row.course_code,
                course_name: row.course_name,
                credits: row.credits,
                semester: row.semester,
                total: row.total,
                letter,
                grade_point: letter.grade_point(),
                passed: row.passed,
            }
        })
        .collect();

    let credits_attempted = entries.iter().map(|e| i64::from(e.credits)).sum();
    let credits_earned = entries
        .iter()
        .filter(|e| e.passed)
        .map(|e| i64::from(e.credits))
        .sum();
    let average_10 = weighted_average(entries.iter().map(|e| (e.total, e.credits)));
    let average_4 = weighted_average(entries.iter().map(|e| (e.grade_point, e.credits)));

    Transcript {
        student_id,
        student_code: header.student_code,
        full_name: header.full_name,
        entries,
        credits_attempted,
        credits_earned,
        average_10,
        average_4,
    }
}

pub struct ReportService;

impl ReportService {
    #[instrument(skip(db))]
    pub async fn grade_distribution(
        db: &PgPool,
        section_id: ClassSectionId,
    ) -> Result<GradeDistribution, AppError> {
        let section = sqlx::query_as::<_, SectionSummary>(
            r#"SELECT cs.code, c.name AS course_name,
                      (SELECT COUNT(*) FROM registrations r WHERE r.class_section_id = cs.id) AS enrolled_count
               FROM class_sections cs
               JOIN courses c ON c.id = cs.course_id
               WHERE cs.id = $1"#,
        )
        .bind(section_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        let rows = sqlx::query_as::<_, GradedRow>(
            r#"SELECT g.total, g.letter, g.passed
               FROM grades g
               JOIN registrations r ON r.id = g.registration_id
               WHERE r.class_section_id = $1"#,
        )
        .bind(section_id)
        .fetch_all(db)
        .await?;

        let (distribution, average_total, pass_rate) = summarize_grades(&rows);

        Ok(GradeDistribution {
            class_section_id: section_id,
            class_section_code: section.code,
            course_name: section.course_name,
            enrolled_count: section.enrolled_count,
            graded_count: rows.len() as i64,
            distribution,
            average_total,
            pass_rate,
        })
    }

    #[instrument(skip(db))]
    pub async fn period_statistics(
        db: &PgPool,
        period_id: RegistrationPeriodId,
    ) -> Result<PeriodStatistics, AppError> {
        let period_name =
            sqlx::query_scalar::<_, String>("SELECT name FROM registration_periods WHERE id = $1")
                .bind(period_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(anyhow::anyhow!("Registration period not found"))
                })?;

        let rows = sqlx::query_as::<_, SectionEnrollmentRow>(
            r#"SELECT cs.id AS class_section_id, cs.code AS class_section_code,
                      c.code AS course_code, c.name AS course_name,
                      lu.full_name AS lecturer_name, cs.capacity,
                      (SELECT COUNT(*) FROM registrations r WHERE r.class_section_id = cs.id) AS enrolled_count
               FROM class_sections cs
               JOIN courses c ON c.id = cs.course_id
               LEFT JOIN lecturers l ON l.id = cs.lecturer_id
               LEFT JOIN users lu ON lu.id = l.user_id
               WHERE cs.registration_period_id = $1
               ORDER BY cs.code"#,
        )
        .bind(period_id)
        .fetch_all(db)
        .await?;

        let student_count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(DISTINCT r.student_id)
               FROM registrations r
               JOIN class_sections cs ON cs.id = r.class_section_id
               WHERE cs.registration_period_id = $1"#,
        )
        .bind(period_id)
        .fetch_one(db)
        .await?;

        let sections: Vec<SectionEnrollment> = rows.into_iter().map(SectionEnrollment::from).collect();
        let total_capacity: i64 = sections.iter().map(|s| i64::from(s.capacity)).sum();
        let total_enrolled: i64 = sections.iter().map(|s| s.enrolled_count).sum();

        Ok(PeriodStatistics {
            registration_period_id: period_id,
            registration_period_name: period_name,
            section_count: sections.len() as i64,
            total_capacity,
            total_enrolled,
            student_count,
            fill_rate: percentage(total_enrolled, total_capacity),
            sections,
        })
    }

    #[instrument(skip(db))]
    pub async fn transcript(db: &PgPool, student_id: StudentId) -> Result<Transcript, AppError> {
        let header = sqlx::query_as::<_, StudentHeader>(
            r#"SELECT s.student_code, u.full_name
               FROM students s
               JOIN users u ON u.id = s.user_id
               WHERE s.id = $1"#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let rows = sqlx::query_as::<_, TranscriptRow>(
            r#"SELECT c.code AS course_code, c.name AS course_name, c.credits,
                      rp.semester, g.total, g.letter, g.passed
               FROM grades g
               JOIN registrations r ON r.id = g.registration_id
               JOIN class_sections cs ON cs.id = r.class_section_id
               JOIN courses c ON c.id = cs.course_id
               JOIN registration_periods rp ON rp.id = cs.registration_period_id
               WHERE r.student_id = $1
               ORDER BY rp.starts_at, c.code"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(build_transcript(student_id, header, rows))
    }
}
