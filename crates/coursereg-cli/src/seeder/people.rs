//! Lecturer and student seeding.

use coursereg_auth::Role;
use coursereg_models::ids::{DepartmentId, LecturerId, UserId};
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::time::Instant;

use super::SEED_EMAIL_DOMAIN;
use super::models::PersonSeed;

const TITLES: [&str; 4] = ["ThS.", "TS.", "PGS.TS.", "GS.TS."];

/// Generates `per_department` people of `role` for every department.
pub fn generate_people(
    department_ids: &[DepartmentId],
    per_department: usize,
    role: Role,
) -> Vec<PersonSeed> {
    let (code_prefix, email_tag) = match role {
        Role::Lecturer => ("SEEDGV", "gv"),
        _ => ("SEEDSV", "sv"),
    };

    department_ids
        .par_iter()
        .enumerate()
        .flat_map(|(dept_idx, &department_id)| {
            (0..per_department)
                .map(|idx| {
                    let first_name: String = FirstName().fake();
                    let last_name: String = LastName().fake();
                    let serial = dept_idx * 1000 + idx;

                    let detail = match role {
                        Role::Lecturer => Some(TITLES[(0..TITLES.len()).fake::<usize>()].to_string()),
                        _ => Some(format!("K{}", (64..68).fake::<u32>())),
                    };

                    PersonSeed {
                        email: format!(
                            "{}.{}+{}{}@{}",
                            first_name.to_lowercase(),
                            last_name.to_lowercase(),
                            email_tag,
                            serial,
                            SEED_EMAIL_DOMAIN
                        ),
                        full_name: format!("{} {}", last_name, first_name),
                        code: format!("{}{:05}", code_prefix, serial),
                        role,
                        department_id,
                        detail,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Inserts accounts, roles and profile rows; returns the profile ids grouped
/// with their department.
pub async fn seed_people(
    db: &PgPool,
    department_ids: &[DepartmentId],
    per_department: usize,
    role: Role,
    password_hash: &str,
) -> Result<Vec<(uuid::Uuid, DepartmentId)>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let label = match role {
        Role::Lecturer => "lecturers",
        _ => "students",
    };
    println!(
        "👥 Seeding {} {} ({} per department)...",
        department_ids.len() * per_department,
        label,
        per_department
    );

    let people = generate_people(department_ids, per_department, role);

    let mut tx = db.begin().await?;
    let mut profiles = Vec::with_capacity(people.len());

    // 3 binds per user keeps each chunk well under the Postgres bind limit.
    const BATCH_SIZE: usize = 1000;
    for chunk in people.chunks(BATCH_SIZE) {
        let user_ids = insert_users_chunk(&mut tx, chunk, password_hash).await?;
        assign_role_chunk(&mut tx, &user_ids, role).await?;
        let ids = insert_profiles_chunk(&mut tx, &user_ids, chunk).await?;
        profiles.extend(ids.into_iter().zip(chunk.iter().map(|p| p.department_id)));
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} {} in {:?}",
        profiles.len(),
        label,
        start_time.elapsed()
    );

    Ok(profiles)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    people: &[PersonSeed],
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if people.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO users (full_name, email, password) ");
    query.push_values(people, |mut row, person| {
        row.push_bind(&person.full_name)
            .push_bind(&person.email)
            .push_bind(password_hash);
    });
    query.push(" RETURNING id");

    let ids: Vec<UserId> = query.build_query_scalar().fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn assign_role_chunk(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[UserId],
    role: Role,
) -> Result<(), Box<dyn std::error::Error>> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role)
         SELECT id, $2 FROM UNNEST($1::uuid[]) AS id
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_ids)
    .bind(role.as_code())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_profiles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[UserId],
    people: &[PersonSeed],
) -> Result<Vec<uuid::Uuid>, Box<dyn std::error::Error>> {
    if people.is_empty() {
        return Ok(Vec::new());
    }

    let rows = user_ids.iter().zip(people.iter());
    let mut query: QueryBuilder<Postgres> = match people[0].role {
        Role::Lecturer => QueryBuilder::new(
            "INSERT INTO lecturers (user_id, lecturer_code, department_id, academic_title) ",
        ),
        _ => QueryBuilder::new("INSERT INTO students (user_id, student_code, department_id, cohort) "),
    };
    query.push_values(rows, |mut row, (user_id, person)| {
        row.push_bind(*user_id)
            .push_bind(&person.code)
            .push_bind(person.department_id)
            .push_bind(&person.detail);
    });
    query.push(" RETURNING id");

    let ids: Vec<uuid::Uuid> = query.build_query_scalar().fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Lecturer ids of each department, used to staff seeded class sections.
pub fn lecturers_by_department(
    lecturers: &[(uuid::Uuid, DepartmentId)],
    department_id: DepartmentId,
) -> Vec<LecturerId> {
    lecturers
        .iter()
        .filter(|(_, dept)| *dept == department_id)
        .map(|(id, _)| LecturerId::from(*id))
        .collect()
}
