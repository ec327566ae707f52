#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use coursereg::coursereg_auth::Role;
use coursereg::coursereg_auth::jwt::create_access_token;
use coursereg::coursereg_config::{CorsConfig, JwtConfig, RateLimitConfig};
use coursereg::coursereg_core::hash_password;
use coursereg::router::init_router;
use coursereg::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Role>,
}

impl TestUser {
    pub fn token(&self) -> String {
        create_access_token(
            self.id,
            &self.email,
            &self.full_name,
            self.roles.clone(),
            &JwtConfig::from_env(),
        )
        .unwrap()
    }
}

/// Router over `pool` with auth rate limiting switched off.
pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with_rate_limit(pool, RateLimitConfig::disabled())
}

pub fn setup_test_app_with_rate_limit(pool: PgPool, rate_limit_config: RateLimitConfig) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config,
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.coursereg.local", Uuid::new_v4())
}

pub fn generate_unique_code(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..8]).to_uppercase()
}

pub async fn create_test_user(pool: &PgPool, full_name: &str, roles: &[Role]) -> TestUser {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password, full_name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&email)
    .bind(&hashed)
    .bind(full_name)
    .fetch_one(pool)
    .await
    .unwrap();

    for role in roles {
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(id)
            .bind(role.as_code())
            .execute(pool)
            .await
            .unwrap();
    }

    TestUser {
        id,
        email,
        full_name: full_name.to_string(),
        roles: roles.to_vec(),
    }
}

pub async fn create_admin(pool: &PgPool) -> TestUser {
    create_test_user(pool, "Quản Trị Viên", &[Role::Admin]).await
}

pub async fn create_department(pool: &PgPool) -> Uuid {
    let code = generate_unique_code("K");
    sqlx::query_scalar("INSERT INTO departments (code, name) VALUES ($1, $2) RETURNING id")
        .bind(&code)
        .bind(format!("Khoa {}", code))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Student account plus profile, returns the user and the student id.
pub async fn create_student(pool: &PgPool, department_id: Uuid) -> (TestUser, Uuid) {
    let user = create_test_user(pool, "Nguyễn Văn An", &[Role::Student]).await;
    let student_id = sqlx::query_scalar(
        "INSERT INTO students (user_id, department_id, student_code, cohort) \
         VALUES ($1, $2, $3, 'K65') RETURNING id",
    )
    .bind(user.id)
    .bind(department_id)
    .bind(generate_unique_code("SV"))
    .fetch_one(pool)
    .await
    .unwrap();
    (user, student_id)
}

/// Lecturer account plus profile, returns the user and the lecturer id.
pub async fn create_lecturer(pool: &PgPool, department_id: Uuid) -> (TestUser, Uuid) {
    let user = create_test_user(pool, "Trần Thị Bình", &[Role::Lecturer]).await;
    let lecturer_id = sqlx::query_scalar(
        "INSERT INTO lecturers (user_id, department_id, lecturer_code) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user.id)
    .bind(department_id)
    .bind(generate_unique_code("GV"))
    .fetch_one(pool)
    .await
    .unwrap();
    (user, lecturer_id)
}

pub async fn create_course(pool: &PgPool, department_id: Uuid, credits: i32) -> Uuid {
    let code = generate_unique_code("HP");
    sqlx::query_scalar(
        "INSERT INTO courses (code, name, credits, department_id) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&code)
    .bind(format!("Học phần {}", code))
    .bind(credits)
    .bind(department_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// A period that is currently open when `open` is true, one that ended
/// yesterday otherwise.
pub async fn create_period(pool: &PgPool, open: bool) -> Uuid {
    let sql = if open {
        "INSERT INTO registration_periods (name, semester, starts_at, ends_at) \
         VALUES ('Đợt 1', 'HK1 2026-2027', NOW() - INTERVAL '1 day', NOW() + INTERVAL '7 days') \
         RETURNING id"
    } else {
        "INSERT INTO registration_periods (name, semester, starts_at, ends_at) \
         VALUES ('Đợt cũ', 'HK2 2025-2026', NOW() - INTERVAL '30 days', NOW() - INTERVAL '1 day') \
         RETURNING id"
    };
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

pub async fn create_section(
    pool: &PgPool,
    course_id: Uuid,
    lecturer_id: Option<Uuid>,
    period_id: Uuid,
    capacity: i32,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO class_sections (code, course_id, lecturer_id, registration_period_id, room, capacity) \
         VALUES ($1, $2, $3, $4, 'A2-301', $5) RETURNING id",
    )
    .bind(generate_unique_code("LHP"))
    .bind(course_id)
    .bind(lecturer_id)
    .bind(period_id)
    .bind(capacity)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_schedule(
    pool: &PgPool,
    section_id: Uuid,
    weekday: i16,
    start_period: i16,
    period_count: i16,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO schedules (class_section_id, weekday, start_period, period_count, start_date, end_date) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(section_id)
    .bind(weekday)
    .bind(start_period)
    .bind(period_count)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll(pool: &PgPool, student_id: Uuid, section_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO registrations (student_id, class_section_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(student_id)
    .bind(section_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
