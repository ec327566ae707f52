use sqlx::PgPool;
use tracing::instrument;

use coursereg_core::{AppError, PaginationMeta};
use coursereg_models::ids::CourseId;

use crate::modules::courses::model::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};

const COURSE_SELECT: &str = r#"SELECT c.id, c.code, c.name, c.credits, c.department_id,
       d.name AS department_name, c.description, c.created_at, c.updated_at
FROM courses c
JOIN departments d ON d.id = c.department_id"#;

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::bad_request(anyhow::anyhow!("Course code already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return AppError::bad_request(anyhow::anyhow!("Department not found"));
        }
    }
    AppError::from(e)
}

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let id = sqlx::query_scalar::<_, CourseId>(
            r#"INSERT INTO courses (code, name, credits, department_id, description)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(dto.credits)
        .bind(dto.department_id)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(map_write_error)?;

        Self::get_course_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filters: CourseFilterParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters.search.as_ref().map(|s| format!("%{}%", s));

        let where_clause = r#"WHERE ($1::uuid IS NULL OR c.department_id = $1)
              AND ($2::text IS NULL OR c.code ILIKE $2 OR c.name ILIKE $2)"#;

        let total =
            sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM courses c {}", where_clause))
                .bind(filters.department_id)
                .bind(&search)
                .fetch_one(db)
                .await?;

        let courses = sqlx::query_as::<_, Course>(&format!(
            "{} {} ORDER BY c.code LIMIT $3 OFFSET $4",
            COURSE_SELECT, where_clause
        ))
        .bind(filters.department_id)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: CourseId) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!("{} WHERE c.id = $1", COURSE_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        id: CourseId,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let result = sqlx::query(
            r#"UPDATE courses
               SET code = COALESCE($2, code),
                   name = COALESCE($3, name),
                   credits = COALESCE($4, credits),
                   department_id = COALESCE($5, department_id),
                   description = COALESCE($6, description),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(dto.code.as_deref().map(str::trim))
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.credits)
        .bind(dto.department_id)
        .bind(&dto.description)
        .execute(db)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Self::get_course_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: CourseId) -> Result<(), AppError> {
        let section_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM class_sections WHERE course_id = $1",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        if section_count > 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Course has {} class sections and cannot be deleted",
                section_count
            )));
        }

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Course not found")));
        }

        Ok(())
    }
}
