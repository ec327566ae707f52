//! Administrator account creation.

use coursereg_auth::Role;
use coursereg_core::hash_password;
use coursereg_models::ids::UserId;
use sqlx::PgPool;

/// Creates a login account holding the `ADMIN` role.
///
/// Fails when the email is already registered.
pub async fn create_admin(
    db: &PgPool,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let mut tx = db.begin().await?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (full_name, email, password)
         VALUES ($1, $2, $3)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(full_name)
    .bind(email.trim().to_lowercase())
    .bind(&hashed_password)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(user_id) = user_id else {
        tx.rollback().await?;
        return Err("User with this email already exists".into());
    };

    sqlx::query(
        "INSERT INTO user_roles (user_id, role)
         VALUES ($1, $2)
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_id)
    .bind(Role::Admin.as_code())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(user_id)
}
