use axum::Json;
use axum::extract::State;
use tracing::instrument;

use coursereg_core::AppError;

use super::model::{
    ChangePasswordDto, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RefreshTokenRequest,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Login and receive an access and refresh token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid email or password"),
        (status = 422, description = "Validation error"),
        (status = 429, description = "Too many login attempts")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = LoginResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::refresh(&state.db, &dto.refresh_token, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = AuthService::profile(&state.db, auth_user.user_id()?).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::change_password(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(response))
}
