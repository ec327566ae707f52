mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_course, create_department, create_period, create_schedule,
    create_section, create_student, date, enroll, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

fn register_body(section_id: uuid::Uuid) -> Option<serde_json::Value> {
    Some(json!({ "class_section_id": section_id }))
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_and_list_my_registrations(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, student_id) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);
    let token = student.token();

    let (status, created) =
        send(&app, "POST", "/api/dangky", Some(&token), register_body(section_id)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["student_id"], student_id.to_string());
    assert_eq!(created["class_section_id"], section_id.to_string());
    assert_eq!(created["credits"], 3);

    let (status, mine) = send(&app, "GET", "/api/dangky/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], created["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_requires_student_role(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&admin.token()),
        register_body(section_id),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. SINHVIEN role required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejected_when_period_closed(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, false).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, _) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&student.token()),
        register_body(section_id),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Registration period is not open");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_unknown_section(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let (student, _) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&student.token()),
        register_body(uuid::Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_twice_is_conflict(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, _) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);
    let token = student.token();

    let (status, _) =
        send(&app, "POST", "/api/dangky", Some(&token), register_body(section_id)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send(&app, "POST", "/api/dangky", Some(&token), register_body(section_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already registered for this class section");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_full_section(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 1).await;
    let (_, first) = create_student(&pool, department_id).await;
    enroll(&pool, first, section_id).await;
    let (late, _) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&late.token()),
        register_body(section_id),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Class section is full");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_schedule_conflict(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let period_id = create_period(&pool, true).await;
    let first_course = create_course(&pool, department_id, 3).await;
    let second_course = create_course(&pool, department_id, 2).await;
    let taken = create_section(&pool, first_course, None, period_id, 40).await;
    let clashing = create_section(&pool, second_course, None, period_id, 40).await;
    let later = create_section(&pool, second_course, None, period_id, 40).await;

    // Monday periods 1-3 against Monday periods 3-4 in the same term
    create_schedule(&pool, taken, 2, 1, 3, date(2026, 9, 7), date(2026, 12, 20)).await;
    create_schedule(&pool, clashing, 2, 3, 2, date(2026, 9, 7), date(2026, 12, 20)).await;
    // Monday periods 4-5 only touches the end of periods 1-3
    create_schedule(&pool, later, 2, 4, 2, date(2026, 9, 7), date(2026, 12, 20)).await;

    let (student, student_id) = create_student(&pool, department_id).await;
    enroll(&pool, student_id, taken).await;
    let app = setup_test_app(pool);
    let token = student.token();

    let (status, body) =
        send(&app, "POST", "/api/dangky", Some(&token), register_body(clashing)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Schedule conflicts with class section")
    );

    let (status, _) = send(&app, "POST", "/api/dangky", Some(&token), register_body(later)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_ignores_sessions_in_other_terms(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let period_id = create_period(&pool, true).await;
    let first_course = create_course(&pool, department_id, 3).await;
    let second_course = create_course(&pool, department_id, 3).await;
    let autumn = create_section(&pool, first_course, None, period_id, 40).await;
    let spring = create_section(&pool, second_course, None, period_id, 40).await;

    create_schedule(&pool, autumn, 4, 1, 3, date(2026, 9, 7), date(2026, 12, 20)).await;
    create_schedule(&pool, spring, 4, 1, 3, date(2027, 1, 4), date(2027, 4, 30)).await;

    let (student, student_id) = create_student(&pool, department_id).await;
    enroll(&pool, student_id, autumn).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&student.token()),
        register_body(spring),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_second_section_of_same_course(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let morning = create_section(&pool, course_id, None, period_id, 40).await;
    let evening = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, student_id) = create_student(&pool, department_id).await;
    enroll(&pool, student_id, morning).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/dangky",
        Some(&student.token()),
        register_body(evening),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .ends_with("of the same course")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_registrations_for_same_course_admit_one(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let morning = create_section(&pool, course_id, None, period_id, 40).await;
    let evening = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, student_id) = create_student(&pool, department_id).await;
    let app = setup_test_app(pool.clone());
    let token = student.token();

    let (first, second) = tokio::join!(
        send(&app, "POST", "/api/dangky", Some(&token), register_body(morning)),
        send(&app, "POST", "/api/dangky", Some(&token), register_body(evening)),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let stored: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancel_registration(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (owner, owner_id) = create_student(&pool, department_id).await;
    let (intruder, _) = create_student(&pool, department_id).await;
    let registration_id = enroll(&pool, owner_id, section_id).await;
    let app = setup_test_app(pool);
    let uri = format!("/api/dangky/{}", registration_id);

    let (status, _) = send(&app, "DELETE", &uri, Some(&intruder.token()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner.token()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, Some(&owner.token()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cancel_rejected_after_period_closes(pool: PgPool) {
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, false).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, student_id) = create_student(&pool, department_id).await;
    let registration_id = enroll(&pool, student_id, section_id).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/dangky/{}", registration_id),
        Some(&student.token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_lists_registrations(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let department_id = create_department(&pool).await;
    let course_id = create_course(&pool, department_id, 3).await;
    let period_id = create_period(&pool, true).await;
    let section_id = create_section(&pool, course_id, None, period_id, 40).await;
    let (student, first) = create_student(&pool, department_id).await;
    let (_, second) = create_student(&pool, department_id).await;
    enroll(&pool, first, section_id).await;
    enroll(&pool, second, section_id).await;
    let app = setup_test_app(pool);

    let (status, list) = send(
        &app,
        "GET",
        &format!("/api/dangky?class_section_id={}", section_id),
        Some(&admin.token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["meta"]["total"], 2);

    let (status, _) = send(&app, "GET", "/api/dangky", Some(&student.token()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
