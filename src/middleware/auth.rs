use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use coursereg_auth::{Claims, Role, verify_token};
use coursereg_core::AppError;
use coursereg_models::ids::UserId;

use crate::state::AppState;

/// The verified claims of the caller's access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn roles(&self) -> &[Role] {
        &self.0.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0.has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.0.has_any_role(roles)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::unauthorized("Missing or invalid authorization header".to_string())
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Declares an extractor that admits callers holding any of the listed roles.
#[macro_export]
macro_rules! require_role {
    ($name:ident, [$($role:expr),+ $(,)?], $label:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = coursereg_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !auth_user.has_any_role(&[$($role),+]) {
                    return Err(coursereg_core::AppError::forbidden(format!(
                        "Access denied. {} role required",
                        $label
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireAdmin, [Role::Admin], "ADMIN");
require_role!(RequireLecturer, [Role::Lecturer], "GIANGVIEN");
require_role!(RequireStudent, [Role::Student], "SINHVIEN");
require_role!(RequireStaff, [Role::Admin, Role::Lecturer], "ADMIN or GIANGVIEN");
