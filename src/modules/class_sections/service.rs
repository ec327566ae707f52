use sqlx::PgPool;
use tracing::instrument;

use coursereg_core::{AppError, PaginationMeta};
use coursereg_models::ids::{ClassSectionId, LecturerId};

use crate::modules::class_sections::model::{
    ClassSection, ClassSectionFilterParams, CreateClassSectionDto, PaginatedClassSectionsResponse,
    RosterEntry, UpdateClassSectionDto,
};

pub(crate) const CLASS_SECTION_SELECT: &str = r#"SELECT cs.id, cs.code, cs.course_id,
       c.code AS course_code, c.name AS course_name, c.credits,
       cs.lecturer_id, lu.full_name AS lecturer_name,
       cs.registration_period_id, rp.name AS registration_period_name,
       cs.room, cs.capacity,
       (SELECT COUNT(*) FROM registrations r WHERE r.class_section_id = cs.id) AS enrolled_count,
       cs.created_at, cs.updated_at
FROM class_sections cs
JOIN courses c ON c.id = cs.course_id
JOIN registration_periods rp ON rp.id = cs.registration_period_id
LEFT JOIN lecturers l ON l.id = cs.lecturer_id
LEFT JOIN users lu ON lu.id = l.user_id"#;

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!("Class section code already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow::anyhow!(
                "Course, lecturer or registration period not found"
            ));
        }
    }
    AppError::from(e)
}

pub struct ClassSectionService;

impl ClassSectionService {
    #[instrument(skip(db))]
    pub async fn create_class_section(
        db: &PgPool,
        dto: CreateClassSectionDto,
    ) -> Result<ClassSection, AppError> {
        let id = sqlx::query_scalar::<_, ClassSectionId>(
            r#"INSERT INTO class_sections (code, course_id, lecturer_id, registration_period_id, room, capacity)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(dto.code.trim())
        .bind(dto.course_id)
        .bind(dto.lecturer_id)
        .bind(dto.registration_period_id)
        .bind(&dto.room)
        .bind(dto.capacity)
        .fetch_one(db)
        .await
        .map_err(map_write_error)?;

        Self::get_class_section_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_class_sections(
        db: &PgPool,
        filters: ClassSectionFilterParams,
    ) -> Result<PaginatedClassSectionsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters.search.as_ref().map(|s| format!("%{}%", s));

        let where_clause = r#"WHERE ($1::uuid IS NULL OR cs.course_id = $1)
              AND ($2::uuid IS NULL OR cs.lecturer_id = $2)
              AND ($3::uuid IS NULL OR cs.registration_period_id = $3)
              AND ($4::text IS NULL OR cs.code ILIKE $4 OR c.code ILIKE $4 OR c.name ILIKE $4)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM class_sections cs JOIN courses c ON c.id = cs.course_id {}",
            where_clause
        ))
        .bind(filters.course_id)
        .bind(filters.lecturer_id)
        .bind(filters.registration_period_id)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let sections = sqlx::query_as::<_, ClassSection>(&format!(
            "{} {} ORDER BY cs.code LIMIT $5 OFFSET $6",
            CLASS_SECTION_SELECT, where_clause
        ))
        .bind(filters.course_id)
        .bind(filters.lecturer_id)
        .bind(filters.registration_period_id)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedClassSectionsResponse {
            data: sections,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_class_section_by_id(
        db: &PgPool,
        id: ClassSectionId,
    ) -> Result<ClassSection, AppError> {
        sqlx::query_as::<_, ClassSection>(&format!("{} WHERE cs.id = $1", CLASS_SECTION_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_sections_for_lecturer(
        db: &PgPool,
        lecturer_id: LecturerId,
    ) -> Result<Vec<ClassSection>, AppError> {
        let sections = sqlx::query_as::<_, ClassSection>(&format!(
            "{} WHERE cs.lecturer_id = $1 ORDER BY rp.starts_at DESC, cs.code",
            CLASS_SECTION_SELECT
        ))
        .bind(lecturer_id)
        .fetch_all(db)
        .await?;

        Ok(sections)
    }

    /// The section row is locked while the new capacity is compared with the
    /// current enrolment, so a concurrent registration cannot slip past it.
    #[instrument(skip(db))]
    pub async fn update_class_section(
        db: &PgPool,
        id: ClassSectionId,
        dto: UpdateClassSectionDto,
    ) -> Result<ClassSection, AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, ClassSectionId>(
            "SELECT id FROM class_sections WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        if let Some(capacity) = dto.capacity {
            let enrolled = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM registrations WHERE class_section_id = $1",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if i64::from(capacity) < enrolled {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Capacity cannot be lower than the {} students already registered",
                    enrolled
                )));
            }
        }

        sqlx::query(
            r#"UPDATE class_sections
               SET code = COALESCE($2, code),
                   lecturer_id = COALESCE($3, lecturer_id),
                   room = COALESCE($4, room),
                   capacity = COALESCE($5, capacity),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(dto.code.as_deref().map(str::trim))
        .bind(dto.lecturer_id)
        .bind(&dto.room)
        .bind(dto.capacity)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        Self::get_class_section_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_class_section(db: &PgPool, id: ClassSectionId) -> Result<(), AppError> {
        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE class_section_id = $1",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if enrolled > 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Class section has {} registered students and cannot be deleted",
                enrolled
            )));
        }

        let result = sqlx::query("DELETE FROM class_sections WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class section not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_roster(
        db: &PgPool,
        id: ClassSectionId,
    ) -> Result<Vec<RosterEntry>, AppError> {
        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"SELECT r.id AS registration_id, s.id AS student_id, s.student_code,
                      u.full_name, u.email, s.cohort, r.registered_at
               FROM registrations r
               JOIN students s ON s.id = r.student_id
               JOIN users u ON u.id = s.user_id
               WHERE r.class_section_id = $1
               ORDER BY s.student_code"#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(roster)
    }
}
