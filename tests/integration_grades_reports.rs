mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_course, create_department, create_lecturer, create_period,
    create_section, create_student, enroll, send, setup_test_app,
};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

struct GradedSection {
    section_id: Uuid,
    period_id: Uuid,
    lecturer_token: String,
    good_registration: Uuid,
    weak_registration: Uuid,
    good_student: (String, Uuid),
}

async fn graded_section(pool: &PgPool) -> GradedSection {
    let department_id = create_department(pool).await;
    let (lecturer, lecturer_id) = create_lecturer(pool, department_id).await;
    let course_id = create_course(pool, department_id, 3).await;
    let period_id = create_period(pool, true).await;
    let section_id = create_section(pool, course_id, Some(lecturer_id), period_id, 40).await;
    let (good, good_id) = create_student(pool, department_id).await;
    let (_, weak_id) = create_student(pool, department_id).await;
    let good_registration = enroll(pool, good_id, section_id).await;
    let weak_registration = enroll(pool, weak_id, section_id).await;

    GradedSection {
        section_id,
        period_id,
        lecturer_token: lecturer.token(),
        good_registration,
        weak_registration,
        good_student: (good.token(), good_id),
    }
}

async fn put_grade(
    app: &axum::Router,
    token: &str,
    registration_id: Uuid,
    scores: (f64, f64, f64),
) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        "/api/diem",
        Some(token),
        Some(json!({
            "registration_id": registration_id,
            "attendance": scores.0,
            "midterm": scores.1,
            "final_exam": scores.2
        })),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lecturer_records_and_updates_grade(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    let (status, grade) = put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (8.0, 7.0, 9.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&grade["total"], 8.2);
    assert_eq!(grade["letter"], "B");
    assert_eq!(grade["passed"], true);

    let (status, grade) = put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (10.0, 9.0, 9.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&grade["total"], 9.2);
    assert_eq!(grade["letter"], "A");
    assert_eq!(grade["classification"], "Giỏi");

    let (status, sheet) = send(
        &app,
        "GET",
        &format!("/api/diem/lophocphan/{}", fixture.section_id),
        Some(&fixture.lecturer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = sheet["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let ungraded = entries
        .iter()
        .find(|e| e["registration_id"] == fixture.weak_registration.to_string())
        .unwrap();
    assert!(ungraded["total"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_grade_update_keeps_recorded_components(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (8.0, 7.0, 9.0),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, grade) = send(
        &app,
        "PUT",
        "/api/diem",
        Some(&fixture.lecturer_token),
        Some(json!({
            "registration_id": fixture.good_registration,
            "final_exam": 10.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_close(&grade["attendance"], 8.0);
    assert_close(&grade["midterm"], 7.0);
    assert_close(&grade["final_exam"], 10.0);
    assert_close(&grade["total"], 8.7);
    assert_eq!(grade["letter"], "A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_out_of_range_is_rejected(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (8.0, 11.0, 9.0),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_lecturer_cannot_grade(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let department_id = create_department(&pool).await;
    let (outsider, _) = create_lecturer(&pool, department_id).await;
    let app = setup_test_app(pool);

    let (status, _) = put_grade(
        &app,
        &outsider.token(),
        fixture.good_registration,
        (8.0, 7.0, 9.0),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = put_grade(
        &app,
        &fixture.good_student.0,
        fixture.good_registration,
        (10.0, 10.0, 10.0),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_graded_registration_cannot_be_cancelled(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (8.0, 7.0, 9.0),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/dangky/{}", fixture.good_registration),
        Some(&fixture.good_student.0),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_sees_own_grades(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    put_grade(
        &app,
        &fixture.lecturer_token,
        fixture.good_registration,
        (8.0, 7.0, 9.0),
    )
    .await;

    let (status, grades) = send(&app, "GET", "/api/diem/me", Some(&fixture.good_student.0), None).await;
    assert_eq!(status, StatusCode::OK);
    let grades = grades.as_array().unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0]["letter"], "B");
    assert_eq!(grades[0]["credits"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_distribution(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);

    put_grade(&app, &fixture.lecturer_token, fixture.good_registration, (8.0, 7.0, 9.0)).await;
    put_grade(&app, &fixture.lecturer_token, fixture.weak_registration, (2.0, 3.0, 3.0)).await;

    let (status, report) = send(
        &app,
        "GET",
        &format!("/api/baocao/lophocphan/{}/phan-bo-diem", fixture.section_id),
        Some(&fixture.lecturer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["enrolled_count"], 2);
    assert_eq!(report["graded_count"], 2);
    assert_close(&report["average_total"], 5.5);
    assert_close(&report["pass_rate"], 50.0);

    let counts: Vec<(String, i64)> = report["distribution"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["letter"].as_str().unwrap().to_string(),
                c["count"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        counts,
        vec![
            ("A".to_string(), 0),
            ("B".to_string(), 1),
            ("C".to_string(), 0),
            ("D".to_string(), 0),
            ("F".to_string(), 1),
        ]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_period_statistics_are_admin_only(pool: PgPool) {
    let admin = create_admin(&pool).await;
    let fixture = graded_section(&pool).await;
    let app = setup_test_app(pool);
    let uri = format!("/api/baocao/dotdangky/{}/thong-ke", fixture.period_id);

    let (status, _) = send(&app, "GET", &uri, Some(&fixture.lecturer_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, stats) = send(&app, "GET", &uri, Some(&admin.token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["section_count"], 1);
    assert_eq!(stats["total_capacity"], 40);
    assert_eq!(stats["total_enrolled"], 2);
    assert_eq!(stats["student_count"], 2);
    assert_close(&stats["fill_rate"], 5.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_transcript(pool: PgPool) {
    let fixture = graded_section(&pool).await;
    let (student_token, student_id) = fixture.good_student.clone();

    let department_id = create_department(&pool).await;
    let (other_lecturer, other_lecturer_id) = create_lecturer(&pool, department_id).await;
    let course_id = create_course(&pool, department_id, 2).await;
    let section_id =
        create_section(&pool, course_id, Some(other_lecturer_id), fixture.period_id, 40).await;
    let second_registration = enroll(&pool, student_id, section_id).await;
    let (peer, _) = create_student(&pool, department_id).await;
    let admin = create_admin(&pool).await;
    let app = setup_test_app(pool);

    put_grade(&app, &fixture.lecturer_token, fixture.good_registration, (8.0, 7.0, 9.0)).await;
    put_grade(&app, &other_lecturer.token(), second_registration, (2.0, 3.0, 3.0)).await;

    let uri = format!("/api/baocao/sinhvien/{}/bang-diem", student_id);

    let (status, transcript) = send(&app, "GET", &uri, Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript["entries"].as_array().unwrap().len(), 2);
    assert_eq!(transcript["credits_attempted"], 5);
    assert_eq!(transcript["credits_earned"], 3);
    assert_close(&transcript["average_10"], 6.04);
    assert_close(&transcript["average_4"], 1.8);

    let (status, _) = send(&app, "GET", &uri, Some(&peer.token()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&admin.token()), None).await;
    assert_eq!(status, StatusCode::OK);
}
