mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_course, create_department, create_lecturer, create_period,
    create_section, create_student, enroll, generate_unique_code, generate_unique_email, send,
    setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_department_crud(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let app = setup_test_app(pool);
    let token = admin.token();

    let (status, created) = send(
        &app,
        "POST",
        "/api/khoa",
        Some(&token),
        Some(json!({ "code": "CNTT", "name": "Công nghệ thông tin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/khoa",
        Some(&token),
        Some(json!({ "code": "CNTT", "name": "Khoa trùng mã" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/khoa/{}", id),
        Some(&token),
        Some(json!({ "description": "Khoa CNTT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["code"], "CNTT");
    assert_eq!(updated["description"], "Khoa CNTT");

    let (status, list) = send(&app, "GET", "/api/khoa?search=cntt", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 1);

    let (status, _) = send(&app, "DELETE", &format!("/api/khoa/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/khoa/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_department_in_use_cannot_be_deleted(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    create_course(&pool, department_id, 3).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/khoa/{}", department_id),
        Some(&admin.token()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Department is still referenced by courses, lecturers or students"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_catalog_writes_require_admin(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let (student, _) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);
    let token = student.token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/khoa",
        Some(&token),
        Some(json!({ "code": "KT", "name": "Kinh tế" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. ADMIN role required");

    let (status, _) = send(&app, "GET", "/api/khoa", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/sinhvien", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_crud(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let app = setup_test_app(pool);
    let token = admin.token();
    let code = generate_unique_code("INT");

    let (status, created) = send(
        &app,
        "POST",
        "/api/hocphan",
        Some(&token),
        Some(json!({
            "code": code,
            "name": "Lập trình Rust",
            "credits": 3,
            "department_id": department_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["credits"], 3);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/hocphan",
        Some(&token),
        Some(json!({
            "code": code,
            "name": "Trùng mã",
            "credits": 2,
            "department_id": department_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Course code already exists");

    let (status, _) = send(
        &app,
        "POST",
        "/api/hocphan",
        Some(&token),
        Some(json!({
            "code": generate_unique_code("INT"),
            "name": "Quá nhiều tín chỉ",
            "credits": 11,
            "department_id": department_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/hocphan?department_id={}", department_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 1);
    assert_eq!(list["data"][0]["name"], "Lập trình Rust");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/hocphan/{}", id),
        Some(&token),
        Some(json!({ "credits": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["credits"], 4);

    let (status, _) = send(&app, "DELETE", &format!("/api/hocphan/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_account(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let app = setup_test_app(pool);
    let token = admin.token();
    let email = generate_unique_email();

    let (status, created) = send(
        &app,
        "POST",
        "/api/sinhvien",
        Some(&token),
        Some(json!({
            "email": email,
            "password": "password123",
            "full_name": "Lê Văn Cường",
            "student_code": generate_unique_code("SV"),
            "department_id": department_id,
            "cohort": "K66"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], email);
    assert_eq!(created["full_name"], "Lê Văn Cường");

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["vaiTros"], json!(["SINHVIEN"]));

    let student_token = login["token"].as_str().unwrap().to_string();
    let (status, me) = send(&app, "GET", "/api/sinhvien/me", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], created["id"]);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sinhvien",
        Some(&token),
        Some(json!({
            "email": email,
            "password": "password123",
            "full_name": "Trùng Email",
            "student_code": generate_unique_code("SV"),
            "department_id": department_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_lecturer_account(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let (status, created) = send(
        &app,
        "POST",
        "/api/giangvien",
        Some(&admin.token()),
        Some(json!({
            "email": email,
            "password": "password123",
            "full_name": "Phạm Minh Đức",
            "lecturer_code": generate_unique_code("GV"),
            "department_id": department_id,
            "academic_title": "TS"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["academic_title"], "TS");

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["vaiTros"], json!(["GIANGVIEN"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_period_window(pool: PgPool) {
    let admin = create_admin(&pool).await;
    create_period(&pool, false).await;
    let app = setup_test_app(pool);
    let token = admin.token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/dotdangky",
        Some(&token),
        Some(json!({
            "name": "Đợt ngược",
            "semester": "HK1 2026-2027",
            "starts_at": "2026-09-10T00:00:00Z",
            "ends_at": "2026-09-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration period must start before it ends");

    let (status, created) = send(
        &app,
        "POST",
        "/api/dotdangky",
        Some(&token),
        Some(json!({
            "name": "Đợt mở",
            "semester": "HK1 2026-2027",
            "starts_at": "2020-01-01T00:00:00Z",
            "ends_at": "2099-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_open"], true);

    let (status, open) = send(&app, "GET", "/api/dotdangky/open", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let open = open.as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["id"], created["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_class_section_capacity_and_delete_rules(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let (_, lecturer_id) = create_lecturer(&pool, department_id).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, Some(lecturer_id), period_id, 3).await;
    let (_, first) = create_student(&pool, department_id).await;
    let (_, second) = create_student(&pool, department_id).await;
    enroll(&pool, first, section_id).await;
    enroll(&pool, second, section_id).await;
    let app = setup_test_app(pool);
    let token = admin.token();

    let (status, section) = send(
        &app,
        "GET",
        &format!("/api/lophocphan/{}", section_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(section["enrolled_count"], 2);
    assert_eq!(section["capacity"], 3);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/lophocphan/{}", section_id),
        Some(&token),
        Some(json!({ "capacity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/lophocphan/{}", section_id),
        Some(&token),
        Some(json!({ "capacity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["capacity"], 2);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/lophocphan/{}", section_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_roster_visible_to_own_lecturer_only(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let (owner, owner_id) = create_lecturer(&pool, department_id).await;
    let (other, _) = create_lecturer(&pool, department_id).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, Some(owner_id), period_id, 40).await;
    let (_, student_id) = create_student(&pool, department_id).await;
    enroll(&pool, student_id, section_id).await;
    let app = setup_test_app(pool);
    let uri = format!("/api/lophocphan/{}/sinhvien", section_id);

    let (status, roster) = send(&app, "GET", &uri, Some(&owner.token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().unwrap().len(), 1);
    assert_eq!(roster[0]["student_id"], student_id.to_string());

    let (status, _) = send(&app, "GET", &uri, Some(&other.token()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mine) = send(
        &app,
        "GET",
        "/api/giangvien/me/lophocphan",
        Some(&owner.token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine[0]["id"], section_id.to_string());
}
