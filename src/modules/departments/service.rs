use sqlx::PgPool;
use tracing::instrument;

use coursereg_core::{AppError, PaginationMeta};
use coursereg_models::ids::DepartmentId;

use crate::modules::departments::model::{
    CreateDepartmentDto, Department, DepartmentFilterParams, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};

const DUPLICATE_DEPARTMENT: &str = "A department with this code or name already exists";

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"INSERT INTO departments (code, name, description)
               VALUES ($1, $2, $3)
               RETURNING id, code, name, description, created_at, updated_at"#,
        )
        .bind(dto.code.trim())
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(DUPLICATE_DEPARTMENT));
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn get_departments(
        db: &PgPool,
        filters: DepartmentFilterParams,
    ) -> Result<PaginatedDepartmentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters.search.as_ref().map(|s| format!("%{}%", s));

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM departments
               WHERE ($1::text IS NULL OR code ILIKE $1 OR name ILIKE $1)"#,
        )
        .bind(&search)
        .fetch_one(db)
        .await?;

        let departments = sqlx::query_as::<_, Department>(
            r#"SELECT id, code, name, description, created_at, updated_at
               FROM departments
               WHERE ($1::text IS NULL OR code ILIKE $1 OR name ILIKE $1)
               ORDER BY code
               LIMIT $2 OFFSET $3"#,
        )
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedDepartmentsResponse {
            data: departments,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_department_by_id(
        db: &PgPool,
        id: DepartmentId,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            "SELECT id, code, name, description, created_at, updated_at FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_department(
        db: &PgPool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"UPDATE departments
               SET code = COALESCE($2, code),
                   name = COALESCE($3, name),
                   description = COALESCE($4, description),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, code, name, description, created_at, updated_at"#,
        )
        .bind(id)
        .bind(dto.code.as_deref().map(str::trim))
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.description)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(DUPLICATE_DEPARTMENT));
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Department not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Department is still referenced by courses, lecturers or students"
                    ));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Department not found")));
        }

        Ok(())
    }
}
