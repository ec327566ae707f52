use sqlx::PgPool;
use tracing::instrument;

use coursereg_auth::Role;
use coursereg_core::{AppError, PaginationMeta, hash_password};
use coursereg_models::ids::{StudentId, UserId};

use crate::metrics::track_account_created;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

const STUDENT_SELECT: &str = r#"SELECT s.id, s.user_id, s.student_code, u.full_name, u.email,
       s.department_id, d.name AS department_name, s.cohort, s.date_of_birth,
       s.created_at, s.updated_at
FROM students s
JOIN users u ON u.id = s.user_id
JOIN departments d ON d.id = s.department_id"#;

pub struct StudentService;

impl StudentService {
    /// Creates the login account, grants `SINHVIEN` and inserts the profile
    /// in one transaction.
    #[instrument(skip(db, dto), fields(email = %dto.email, student_code = %dto.student_code))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
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
            .bind(Role::Student.as_code())
            .execute(&mut *tx)
            .await?;

        let student_id = sqlx::query_scalar::<_, StudentId>(
            r#"INSERT INTO students (user_id, department_id, student_code, cohort, date_of_birth)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(user_id)
        .bind(dto.department_id)
        .bind(dto.student_code.trim())
        .bind(&dto.cohort)
        .bind(dto.date_of_birth)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Student code already exists"));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::bad_request(anyhow::anyhow!("Department not found"));
                }
            }
            AppError::from(e)
        })?;

        tx.commit().await?;
        track_account_created(Role::Student);

        Self::get_student_by_id(db, student_id).await
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let search = filters.search.as_ref().map(|s| format!("%{}%", s));

        let where_clause = r#"WHERE ($1::uuid IS NULL OR s.department_id = $1)
              AND ($2::text IS NULL OR s.cohort = $2)
              AND ($3::text IS NULL OR s.student_code ILIKE $3
                   OR u.full_name ILIKE $3 OR u.email ILIKE $3)"#;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM students s JOIN users u ON u.id = s.user_id {}",
            where_clause
        ))
        .bind(filters.department_id)
        .bind(&filters.cohort)
        .bind(&search)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "{} {} ORDER BY s.student_code LIMIT $4 OFFSET $5",
            STUDENT_SELECT, where_clause
        ))
        .bind(filters.department_id)
        .bind(&filters.cohort)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!("{} WHERE s.id = $1", STUDENT_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            r#"UPDATE students
               SET department_id = COALESCE($2, department_id),
                   cohort = COALESCE($3, cohort),
                   date_of_birth = COALESCE($4, date_of_birth),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING user_id"#,
        )
        .bind(id)
        .bind(dto.department_id)
        .bind(&dto.cohort)
        .bind(dto.date_of_birth)
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
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        if let Some(full_name) = &dto.full_name {
            sqlx::query("UPDATE users SET full_name = $1, updated_at = NOW() WHERE id = $2")
                .bind(full_name.trim())
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Self::get_student_by_id(db, id).await
    }

    /// Deletes the student's account together with their registrations and
    /// grades.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM students WHERE id = $1)",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
