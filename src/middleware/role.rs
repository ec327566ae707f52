//! Router-level role guards and in-handler role checks.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use coursereg_auth::Role;
use coursereg_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request unless the caller holds one of `allowed_roles`.
///
/// ```rust,ignore
/// Router::new()
///     .route("/", post(create))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    state: &AppState,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, state).await?;

    check_any_role(&auth_user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(&state, req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, roles: &[Role]) -> Result<(), AppError> {
    if auth_user.has_any_role(roles) {
        return Ok(());
    }

    let required = roles
        .iter()
        .map(Role::as_code)
        .collect::<Vec<_>>()
        .join(" or ");
    Err(AppError::forbidden(format!(
        "Access denied. {} role required",
        required
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursereg_auth::Claims;

    fn auth_user(roles: Vec<Role>) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "sv01@coursereg.edu.vn".to_string(),
            name: "Phạm Thị D".to_string(),
            roles,
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_check_any_role() {
        let student = auth_user(vec![Role::Student]);
        assert!(check_any_role(&student, &[Role::Student]).is_ok());

        let err = check_any_role(&student, &[Role::Admin, Role::Lecturer]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(err.message(), "Access denied. ADMIN or GIANGVIEN role required");
    }

    #[test]
    fn test_multiple_roles() {
        let both = auth_user(vec![Role::Lecturer, Role::Admin]);
        assert!(check_any_role(&both, &[Role::Admin]).is_ok());
        assert!(check_any_role(&both, &[Role::Student]).is_err());
    }
}
