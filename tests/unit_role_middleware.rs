use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Router, middleware};
use coursereg::coursereg_auth::{Claims, Role, create_access_token};
use coursereg::coursereg_config::{CorsConfig, JwtConfig, RateLimitConfig};
use coursereg::middleware::auth::AuthUser;
use coursereg::middleware::role::{check_any_role, require_admin};
use coursereg::state::AppState;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

fn test_state() -> AppState {
    AppState {
        db: PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap(),
        jwt_config: JwtConfig {
            secret: "role-middleware-secret".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        },
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
        rate_limit_config: RateLimitConfig::disabled(),
    }
}

fn admin_only_app(state: AppState) -> Router {
    Router::new()
        .route("/guarded", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .with_state(state)
}

fn token(state: &AppState, roles: Vec<Role>) -> String {
    create_access_token(
        Uuid::new_v4(),
        "user@coursereg.edu.vn",
        "Người Dùng",
        roles,
        &state.jwt_config,
    )
    .unwrap()
}

async fn call(app: Router, token: Option<String>) -> StatusCode {
    let mut builder = Request::builder().uri("/guarded");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_require_admin_without_token() {
    let app = admin_only_app(test_state());
    assert_eq!(call(app, None).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_require_admin_rejects_other_roles() {
    let state = test_state();
    let lecturer = token(&state, vec![Role::Lecturer]);
    let student = token(&state, vec![Role::Student]);

    assert_eq!(
        call(admin_only_app(state.clone()), Some(lecturer)).await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        call(admin_only_app(state), Some(student)).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_require_admin_admits_admin() {
    let state = test_state();
    let admin = token(&state, vec![Role::Lecturer, Role::Admin]);

    assert_eq!(call(admin_only_app(state), Some(admin)).await, StatusCode::OK);
}

#[test]
fn test_check_any_role_lists_required_codes() {
    let student = AuthUser(Claims {
        sub: Uuid::new_v4().to_string(),
        email: "sv01@coursereg.edu.vn".to_string(),
        name: "Nguyễn Văn An".to_string(),
        roles: vec![Role::Student],
        exp: 9999999999,
        iat: 1234567890,
    });

    assert!(check_any_role(&student, &[Role::Student, Role::Admin]).is_ok());

    let err = check_any_role(&student, &[Role::Lecturer]).unwrap_err();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.message(), "Access denied. GIANGVIEN role required");
}
