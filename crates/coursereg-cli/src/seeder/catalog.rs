//! Department, course, period and class section seeding.

use chrono::{Duration, NaiveDate, Utc};
use coursereg_core::timetable::monday_of;
use coursereg_models::ids::{CourseId, DepartmentId, LecturerId, RegistrationPeriodId};
use fake::Fake;
use fake::faker::company::en::Industry;
use fake::faker::lorem::en::Words;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Instant;

use super::SEED_PREFIX;
use super::models::{CourseSeed, DepartmentSeed, SectionSeed};

/// Start periods of the morning and afternoon blocks.
const BLOCK_STARTS: [i16; 4] = [1, 4, 7, 10];
const WEEKS_PER_SEMESTER: i64 = 15;

pub fn generate_departments(count: usize) -> Vec<DepartmentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let industry: String = Industry().fake();
            DepartmentSeed {
                code: format!("{}K{:02}", SEED_PREFIX, idx + 1),
                name: format!("Khoa {} {}", industry, idx + 1),
                description: Some(format!("Seeded department for {}", industry.to_lowercase())),
            }
        })
        .collect()
}

pub async fn seed_departments(
    db: &PgPool,
    count: usize,
) -> Result<Vec<DepartmentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏛  Seeding {} departments...", count);

    let departments = generate_departments(count);
    if departments.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO departments (code, name, description) ");
    query.push_values(&departments, |mut row, dept| {
        row.push_bind(&dept.code)
            .push_bind(&dept.name)
            .push_bind(&dept.description);
    });
    query.push(" RETURNING id");
    let ids: Vec<DepartmentId> = query.build_query_scalar().fetch_all(db).await?;

    println!("   ✓ Inserted {} departments in {:?}", ids.len(), start_time.elapsed());
    Ok(ids)
}

pub fn generate_courses(department_ids: &[DepartmentId], per_department: usize) -> Vec<CourseSeed> {
    department_ids
        .par_iter()
        .enumerate()
        .flat_map(|(dept_idx, &department_id)| {
            (0..per_department)
                .map(|idx| {
                    let words: Vec<String> = Words(2..4).fake();
                    CourseSeed {
                        code: format!("{}{:02}{:02}", SEED_PREFIX, dept_idx + 1, idx + 1),
                        name: capitalize(&words.join(" ")),
                        credits: (2..5).fake::<i32>(),
                        department_id,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    department_ids: &[DepartmentId],
    per_department: usize,
) -> Result<Vec<(CourseId, DepartmentId)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} courses...",
        department_ids.len() * per_department
    );

    let courses = generate_courses(department_ids, per_department);
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO courses (code, name, credits, department_id) ");
    query.push_values(&courses, |mut row, course| {
        row.push_bind(&course.code)
            .push_bind(&course.name)
            .push_bind(course.credits)
            .push_bind(course.department_id);
    });
    query.push(" RETURNING id");
    let ids: Vec<CourseId> = query.build_query_scalar().fetch_all(db).await?;

    println!("   ✓ Inserted {} courses in {:?}", ids.len(), start_time.elapsed());
    Ok(ids
        .into_iter()
        .zip(courses.iter().map(|c| c.department_id))
        .collect())
}

/// Creates one registration period that is open for the next two weeks.
pub async fn seed_open_period(
    db: &PgPool,
) -> Result<RegistrationPeriodId, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let id = sqlx::query_scalar::<_, RegistrationPeriodId>(
        "INSERT INTO registration_periods (name, semester, starts_at, ends_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(format!("{} Đợt đăng ký", SEED_PERIOD_TAG))
    .bind("seed")
    .bind(now - Duration::days(1))
    .bind(now + Duration::days(14))
    .fetch_one(db)
    .await?;

    println!("🗓  Created open registration period {}", id);
    Ok(id)
}

pub const SEED_PERIOD_TAG: &str = "[seed]";

/// Builds sections for every course, staffed from the course's department
/// and given one weekly session each.
pub fn generate_sections(
    courses: &[(CourseId, DepartmentId)],
    lecturers_for: impl Fn(DepartmentId) -> Vec<LecturerId> + Sync,
    per_course: usize,
    semester_start: NaiveDate,
) -> Vec<SectionSeed> {
    let start_date = monday_of(semester_start);
    let end_date = start_date + Duration::weeks(WEEKS_PER_SEMESTER) - Duration::days(1);

    courses
        .par_iter()
        .enumerate()
        .flat_map(|(course_idx, &(course_id, department_id))| {
            let lecturers = lecturers_for(department_id);
            (0..per_course)
                .map(|idx| {
                    let lecturer_id = if lecturers.is_empty() {
                        None
                    } else {
                        Some(lecturers[(course_idx + idx) % lecturers.len()])
                    };
                    SectionSeed {
                        code: format!("{}-{:04}-{:02}", SEED_PREFIX, course_idx + 1, idx + 1),
                        course_id,
                        lecturer_id,
                        room: format!("{}-G{}", (101..510).fake::<u32>(), (1..6).fake::<u32>()),
                        capacity: (30..81).fake::<i32>(),
                        weekday: (2..8).fake::<i16>(),
                        start_period: BLOCK_STARTS[(0..BLOCK_STARTS.len()).fake::<usize>()],
                        period_count: 3,
                        start_date,
                        end_date,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_sections(
    db: &PgPool,
    sections: &[SectionSeed],
    period_id: RegistrationPeriodId,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} class sections with schedules...", sections.len());

    if sections.is_empty() {
        return Ok(0);
    }

    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 1000;
    let mut inserted = 0;
    for chunk in sections.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO class_sections (code, course_id, lecturer_id, registration_period_id, room, capacity) ",
        );
        query.push_values(chunk, |mut row, section| {
            row.push_bind(&section.code)
                .push_bind(section.course_id)
                .push_bind(section.lecturer_id)
                .push_bind(period_id)
                .push_bind(&section.room)
                .push_bind(section.capacity);
        });
        query.push(" RETURNING id");
        let ids: Vec<uuid::Uuid> = query.build_query_scalar().fetch_all(&mut *tx).await?;

        let mut schedules: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO schedules (class_section_id, weekday, start_period, period_count, room, start_date, end_date) ",
        );
        schedules.push_values(ids.iter().zip(chunk.iter()), |mut row, (id, section)| {
            row.push_bind(*id)
                .push_bind(section.weekday)
                .push_bind(section.start_period)
                .push_bind(section.period_count)
                .push_bind(&section.room)
                .push_bind(section.start_date)
                .push_bind(section.end_date);
        });
        schedules.build().execute(&mut *tx).await?;

        inserted += ids.len();
    }

    tx.commit().await?;

    println!("   ✓ Inserted {} sections in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursereg_core::timetable::SessionSlot;

    #[test]
    fn test_generate_departments_have_unique_codes() {
        let departments = generate_departments(12);
        let mut codes: Vec<_> = departments.iter().map(|d| d.code.clone()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 12);
        assert!(codes.iter().all(|c| c.starts_with(SEED_PREFIX)));
    }

    #[test]
    fn test_generate_courses_credit_range() {
        let courses = generate_courses(&[DepartmentId::new(), DepartmentId::new()], 10);
        assert_eq!(courses.len(), 20);
        assert!(courses.iter().all(|c| (1..=10).contains(&c.credits)));
        assert!(courses.iter().all(|c| c.code.len() <= 20));
    }

    #[test]
    fn test_generate_sections_have_valid_slots() {
        let dept = DepartmentId::new();
        let lecturer = LecturerId::new();
        let courses = vec![(CourseId::new(), dept), (CourseId::new(), dept)];
        let start = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();

        let sections = generate_sections(&courses, |_| vec![lecturer], 3, start);

        assert_eq!(sections.len(), 6);
        for section in &sections {
            let slot = SessionSlot {
                weekday: section.weekday,
                start_period: section.start_period,
                period_count: section.period_count,
            };
            assert!(slot.validate().is_ok());
            assert_eq!(section.lecturer_id, Some(lecturer));
            assert_eq!(section.start_date, NaiveDate::from_ymd_opt(2026, 9, 7).unwrap());
            assert!(section.start_date < section.end_date);
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("lập trình web"), "Lập trình web");
        assert_eq!(capitalize(""), "");
    }
}
