use sqlx::PgPool;
use tracing::instrument;

use coursereg_auth::{Role, create_access_token, create_refresh_token, verify_refresh_token};
use coursereg_config::JwtConfig;
use coursereg_core::{AppError, hash_password, verify_password};
use coursereg_models::ids::{LecturerId, StudentId, UserId};
use coursereg_models::{User, UserCredentials};

use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};
use crate::modules::auth::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
};
use crate::utils::auth_helpers::roles_for_user;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, full_name, password FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(dto.email.trim())
        .fetch_optional(db)
        .await?
        else {
            track_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let roles = roles_for_user(db, user.id).await?;
        let response = Self::issue_tokens(user.id, user.email, user.full_name, roles, jwt_config)?;

        track_login_success(&response.roles);
        tracing::info!(user_id = %response.user_id, "user logged in");

        Ok(response)
    }

    /// Exchanges a refresh token for a fresh token pair. Roles are reloaded so
    /// role changes take effect on the next refresh.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        refresh_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config)?;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid or expired refresh token".to_string()))?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("User no longer exists".to_string()))?;

        let roles = roles_for_user(db, user.id).await?;

        Self::issue_tokens(user.id, user.email, user.full_name, roles, jwt_config)
    }

    #[instrument(skip(db))]
    pub async fn profile(db: &PgPool, user_id: UserId) -> Result<ProfileResponse, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let roles = roles_for_user(db, user_id).await?;

        let student_id =
            sqlx::query_scalar::<_, StudentId>("SELECT id FROM students WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?;

        let lecturer_id =
            sqlx::query_scalar::<_, LecturerId>("SELECT id FROM lecturers WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?;

        Ok(ProfileResponse {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            roles,
            student_id,
            lecturer_id,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: UserId,
        dto: ChangePasswordDto,
    ) -> Result<MessageResponse, AppError> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &current_hash)? {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        if dto.current_password == dto.new_password {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "New password must differ from the current password"
            )));
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(MessageResponse::new("Password changed successfully"))
    }

    fn issue_tokens(
        user_id: UserId,
        email: String,
        full_name: String,
        roles: Vec<Role>,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let token = create_access_token(
            user_id.into_inner(),
            &email,
            &full_name,
            roles.clone(),
            jwt_config,
        )?;
        let refresh_token = create_refresh_token(user_id.into_inner(), &email, jwt_config)?;
        track_jwt_issued();

        Ok(LoginResponse {
            token,
            refresh_token,
            user_id,
            full_name,
            email,
            roles,
        })
    }
}
