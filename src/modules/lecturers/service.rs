use sqlx::PgPool;
use tracing::instrument;

use coursereg_auth::Role;
use coursereg_core::{AppError, PaginationMeta, hash_password};
use coursereg_models::ids::{LecturerId, UserId};

use crate::metrics::track_account_created;
use crate::modules::lecturers::model::{
    CreateLecturerDto, Lecturer, LecturerFilterParams, PaginatedLecturersResponse,
    UpdateLecturerDto,
};

const LECTURER_SELECT: &str = r#"SELECT l.id, l.user_id, l.lecturer_code, u.full_name, u.email,
       l.department_id, d.name AS department_name, l.academic_title, l.phone,
       l.created_at, l.updated_at
FROM lecturers l
JOIN users u ON u.id = l.user_id
JOIN departments d ON d.id = l.department_id"#;

pub struct LecturerService;

impl LecturerService {
    /// Creates the login account, grants `GIANGVIEN` and inserts the profile
    /// in one transaction.
    #[instrument(skip(db, dto), fields(email = %dto.email, lecturer_code = %dto.lecturer_code))]
    pub async fn create_lecturer(
        db: &PgPool,
        dto: CreateLecturerDto,
    ) -> Result<Lecturer, AppError> {
        let hashed_password = hash_password(&dto.password)?;
        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users (email, password, full_name) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dto.email.trim().to_lowercase())
        .bind(&hashed_password)
        .bind(dto.full_name.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email already exists"));
            }
            AppError::from(e)
        })?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user_id)
            .bind(Role::Lecturer.as_code())
            .execute(&mut *tx)
            .await?;

        let lecturer_id = sqlx::query_scalar::<_, LecturerId>(
            r#"INSERT INTO lecturers (user_id, department_id, lecturer_code, academic_title, phone)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(user_id)
        .bind(dto.department_id)
        .bind(dto.lecturer_code.trim())
        .bind(&dto.academic_title)
        .bind(&dto.phone)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Lecturer code already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Department not found"));
                }
            }
            AppError::from(e)
        })?;

        tx.commit().await?;
        track_account_created(Role::Lecturer);

        Self::get_lecturer_by_id(db, lecturer_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_lecturers(
        db: &PgPool,
        filters: LecturerFilterParams,
    ) -> Result<PaginatedLecturersResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters.search.as_ref().map(|s| format!("%{}%", s));

        let where_clause = r#"WHERE ($1::uuid IS NULL OR l.department_id = $1)
              AND ($2::text IS NULL OR l.lecturer_code ILIKE $2
                   OR u.full_name ILIKE $2 OR u.email ILIKE $2)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM lecturers l JOIN users u ON u.id = l.user_id {}",
            where_clause
        ))
        .bind(filters.department_id)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let lecturers = sqlx::query_as::<_, Lecturer>(&format!(
            "{} {} ORDER BY l.lecturer_code LIMIT $3 OFFSET $4",
            LECTURER_SELECT, where_clause
        ))
        .bind(filters.department_id)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedLecturersResponse {
            data: lecturers,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_lecturer_by_id(db: &PgPool, id: LecturerId) -> Result<Lecturer, AppError> {
        sqlx::query_as::<_, Lecturer>(&format!("{} WHERE l.id = $1", LECTURER_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lecturer not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_lecturer(
        db: &PgPool,
        id: LecturerId,
        dto: UpdateLecturerDto,
    ) -> Result<Lecturer, AppError> {
        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            r#"UPDATE lecturers
               SET department_id = COALESCE($2, department_id),
                   academic_title = COALESCE($3, academic_title),
                   phone = COALESCE($4, phone),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING user_id"#,
        )
        .bind(id)
        .bind(dto.department_id)
        .bind(&dto.academic_title)
        .bind(&dto.phone)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Department not found"));
            }
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lecturer not found")))?;

        if let Some(full_name) = &dto.full_name {
            sqlx::query("UPDATE users SET full_name = $1, updated_at = NOW() WHERE id = $2")
                .bind(full_name.trim())
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Self::get_lecturer_by_id(db, id).await
    }

    /// Deletes the lecturer's account. The profile goes with it and the
    /// sections they taught become unassigned.
    #[instrument(skip(db))]
    pub async fn delete_lecturer(db: &PgPool, id: LecturerId) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM lecturers WHERE id = $1)",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Lecturer not found")));
        }

        Ok(())
    }
}
