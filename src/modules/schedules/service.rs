use chrono::{Duration, NaiveDate};
use sqlx::PgPool;
use tracing::instrument;

use coursereg_core::AppError;
use coursereg_core::timetable::{SessionSlot, expand_weekly, group_by_week, monday_of};
use coursereg_models::ids::{LecturerId, ScheduleId, StudentId};

use crate::modules::schedules::model::{
    CalendarEvent, CalendarQuery, CalendarResponse, CalendarWeek, CreateScheduleDto, Schedule,
    ScheduleFilterParams, SessionWithSection, UpdateScheduleDto,
};

/// Longest range the calendar endpoint expands.
pub const MAX_CALENDAR_WEEKS: i64 = 26;

const SCHEDULE_SELECT: &str = r#"SELECT id, class_section_id, weekday, start_period, period_count,
       room, start_date, end_date, created_at, updated_at
FROM schedules"#;

pub(crate) const SESSION_SELECT: &str = r#"SELECT sc.id AS schedule_id, cs.id AS class_section_id,
       cs.code AS class_section_code, c.code AS course_code, c.name AS course_name,
       lu.full_name AS lecturer_name, COALESCE(sc.room, cs.room) AS room,
       sc.weekday, sc.start_period, sc.period_count, sc.start_date, sc.end_date
FROM schedules sc
JOIN class_sections cs ON cs.id = sc.class_section_id
JOIN courses c ON c.id = cs.course_id
LEFT JOIN lecturers l ON l.id = cs.lecturer_id
LEFT JOIN users lu ON lu.id = l.user_id"#;

/// Whose teaching or study sessions a calendar shows.
#[derive(Debug, Clone, Copy)]
pub enum CalendarOwner {
    Student(StudentId),
    Lecturer(LecturerId),
}

fn checked_slot(weekday: i16, start_period: i16, period_count: i16) -> Result<SessionSlot, AppError> {
    SessionSlot::new(weekday, start_period, period_count).map_err(AppError::bad_request)
}

fn ensure_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
    if start_date > end_date {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "start_date must not be after end_date"
        )));
    }
    Ok(())
}

/// Resolves the requested range. Missing bounds fall back to the week that
/// contains `today`.
pub fn resolve_range(
    query: &CalendarQuery,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let from = query.from.unwrap_or_else(|| monday_of(query.to.unwrap_or(today)));
    let to = query.to.unwrap_or(from + Duration::days(6));

    if to < from {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Calendar range end must not be before its start"
        )));
    }

    if (to - from).num_days() >= MAX_CALENDAR_WEEKS * 7 {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Calendar range cannot exceed {} weeks",
            MAX_CALENDAR_WEEKS
        )));
    }

    Ok((from, to))
}

/// Expands weekly sessions into dated events inside `[from, to]`, grouped by
/// the Monday of their week.
pub fn build_calendar(
    sessions: &[SessionWithSection],
    from: NaiveDate,
    to: NaiveDate,
) -> CalendarResponse {
    let events: Vec<CalendarEvent> = sessions
        .iter()
        .flat_map(|session| {
            let start = session.start_date.max(from);
            let end = session.end_date.min(to);
            expand_weekly(&session.slot(), start, end)
                .into_iter()
                .map(move |(starts_at, ends_at)| {
                    CalendarEvent::from_session(session, starts_at, ends_at)
                })
        })
        .collect();

    let weeks = group_by_week(events, |event| event.starts_at)
        .into_iter()
        .map(|(week_start, events)| CalendarWeek { week_start, events })
        .collect();

    CalendarResponse { from, to, weeks }
}

pub struct ScheduleService;

impl ScheduleService {
    #[instrument(skip(db))]
    pub async fn create_schedule(
        db: &PgPool,
        dto: CreateScheduleDto,
    ) -> Result<Schedule, AppError> {
        checked_slot(dto.weekday, dto.start_period, dto.period_count)?;
        ensure_dates(dto.start_date, dto.end_date)?;

        sqlx::query_as::<_, Schedule>(
            r#"INSERT INTO schedules (class_section_id, weekday, start_period, period_count, room, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, class_section_id, weekday, start_period, period_count,
                         room, start_date, end_date, created_at, updated_at"#,
        )
        .bind(dto.class_section_id)
        .bind(dto.weekday)
        .bind(dto.start_period)
        .bind(dto.period_count)
        .bind(&dto.room)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Class section not found"));
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db))]
    pub async fn get_schedules(
        db: &PgPool,
        filters: ScheduleFilterParams,
    ) -> Result<Vec<Schedule>, AppError> {
        let schedules = sqlx::query_as::<_, Schedule>(&format!(
            "{} WHERE ($1::uuid IS NULL OR class_section_id = $1) ORDER BY class_section_id, weekday, start_period",
            SCHEDULE_SELECT
        ))
        .bind(filters.class_section_id)
        .fetch_all(db)
        .await?;

        Ok(schedules)
    }

    #[instrument(skip(db))]
    pub async fn get_schedule_by_id(db: &PgPool, id: ScheduleId) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(&format!("{} WHERE id = $1", SCHEDULE_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Schedule not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_schedule(
        db: &PgPool,
        id: ScheduleId,
        dto: UpdateScheduleDto,
    ) -> Result<Schedule, AppError> {
        let existing = Self::get_schedule_by_id(db, id).await?;

        let slot = checked_slot(
            dto.weekday.unwrap_or(existing.weekday),
            dto.start_period.unwrap_or(existing.start_period),
            dto.period_count.unwrap_or(existing.period_count),
        )?;
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        ensure_dates(start_date, end_date)?;

        let schedule = sqlx::query_as::<_, Schedule>(
            r#"UPDATE schedules
               SET weekday = $2, start_period = $3, period_count = $4,
                   room = COALESCE($5, room), start_date = $6, end_date = $7,
                   updated_at = NOW()
               WHERE id = $1
               RETURNING id, class_section_id, weekday, start_period, period_count,
                         room, start_date, end_date, created_at, updated_at"#,
        )
        .bind(id)
        .bind(slot.weekday)
        .bind(slot.start_period)
        .bind(slot.period_count)
        .bind(&dto.room)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(db)
        .await?;

        Ok(schedule)
    }

    #[instrument(skip(db))]
    pub async fn delete_schedule(db: &PgPool, id: ScheduleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Schedule not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_calendar(
        db: &PgPool,
        owner: CalendarOwner,
        query: CalendarQuery,
        today: NaiveDate,
    ) -> Result<CalendarResponse, AppError> {
        let (from, to) = resolve_range(&query, today)?;

        let sessions = match owner {
            CalendarOwner::Student(student_id) => {
                sqlx::query_as::<_, SessionWithSection>(&format!(
                    r#"{} JOIN registrations r ON r.class_section_id = cs.id
                       WHERE r.student_id = $1 AND sc.start_date <= $3 AND sc.end_date >= $2"#,
                    SESSION_SELECT
                ))
                .bind(student_id)
                .bind(from)
                .bind(to)
                .fetch_all(db)
                .await?
            }
            CalendarOwner::Lecturer(lecturer_id) => {
                sqlx::query_as::<_, SessionWithSection>(&format!(
                    "{} WHERE cs.lecturer_id = $1 AND sc.start_date <= $3 AND sc.end_date >= $2",
                    SESSION_SELECT
                ))
                .bind(lecturer_id)
                .bind(from)
                .bind(to)
                .fetch_all(db)
                .await?
            }
        };

        Ok(build_calendar(&sessions, from, to))
    }
}
