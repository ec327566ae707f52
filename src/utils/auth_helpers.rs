use std::str::FromStr;

use sqlx::PgPool;

use coursereg_auth::Role;
use coursereg_core::AppError;
use coursereg_models::ids::{ClassSectionId, LecturerId, StudentId, UserId};

use crate::middleware::auth::AuthUser;

/// Roles stored for a user, in a stable order.
pub async fn roles_for_user(db: &PgPool, user_id: UserId) -> Result<Vec<Role>, AppError> {
    let codes = sqlx::query_scalar::<_, String>(
        "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    codes
        .iter()
        .map(|code| Role::from_str(code).map_err(AppError::internal))
        .collect()
}

/// Student profile of the caller; 403 when the account has none.
pub async fn current_student_id(db: &PgPool, auth_user: &AuthUser) -> Result<StudentId, AppError> {
    let user_id = auth_user.user_id()?;

    sqlx::query_scalar::<_, StudentId>("SELECT id FROM students WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::forbidden("No student profile is linked to this account".to_string())
        })
}

/// Lecturer profile of the caller; 403 when the account has none.
pub async fn current_lecturer_id(
    db: &PgPool,
    auth_user: &AuthUser,
) -> Result<LecturerId, AppError> {
    let user_id = auth_user.user_id()?;

    sqlx::query_scalar::<_, LecturerId>("SELECT id FROM lecturers WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::forbidden("No lecturer profile is linked to this account".to_string())
        })
}

/// Admins may act on any section; lecturers only on the sections they teach.
///
/// Returns 404 when the section does not exist.
pub async fn ensure_section_access(
    db: &PgPool,
    auth_user: &AuthUser,
    section_id: ClassSectionId,
) -> Result<(), AppError> {
    let lecturer_id = sqlx::query_scalar::<_, Option<LecturerId>>(
        "SELECT lecturer_id FROM class_sections WHERE id = $1",
    )
    .bind(section_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

    if auth_user.is_admin() {
        return Ok(());
    }

    if auth_user.has_role(Role::Lecturer) {
        let own_id = current_lecturer_id(db, auth_user).await?;
        if lecturer_id == Some(own_id) {
            return Ok(());
        }
    }

    Err(AppError::forbidden(
        "Only the lecturer of this class section may access it".to_string(),
    ))
}
