//! Schedule (thời khóa biểu) models and calendar views.
//!
//! A schedule row is one weekly recurring session of a class section. The
//! calendar endpoint expands sessions into dated events and groups them by
//! the Monday of their week.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use coursereg_core::serde::deserialize_optional_uuid;
use coursereg_core::timetable::SessionSlot;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ids::{ClassSectionId, ScheduleId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: ScheduleId,
    pub class_section_id: ClassSectionId,
    /// 2 = Monday ... 7 = Saturday, 8 = Sunday
    #[schema(example = 2)]
    pub weekday: i16,
    /// First teaching period (1-15)
    #[schema(example = 1)]
    pub start_period: i16,
    #[schema(example = 3)]
    pub period_count: i16,
    pub room: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn slot(&self) -> SessionSlot {
        SessionSlot {
            weekday: self.weekday,
            start_period: self.start_period,
            period_count: self.period_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateScheduleDto {
    pub class_section_id: ClassSectionId,
    #[validate(range(min = 2, max = 8, message = "Weekday must be between 2 (Monday) and 8 (Sunday)"))]
    pub weekday: i16,
    #[validate(range(min = 1, max = 15, message = "Start period must be between 1 and 15"))]
    pub start_period: i16,
    #[validate(range(min = 1, max = 6, message = "Period count must be between 1 and 6"))]
    pub period_count: i16,
    #[validate(length(max = 50))]
    pub room: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateScheduleDto {
    #[validate(range(min = 2, max = 8, message = "Weekday must be between 2 (Monday) and 8 (Sunday)"))]
    pub weekday: Option<i16>,
    #[validate(range(min = 1, max = 15, message = "Start period must be between 1 and 15"))]
    pub start_period: Option<i16>,
    #[validate(range(min = 1, max = 6, message = "Period count must be between 1 and 6"))]
    pub period_count: Option<i16>,
    #[validate(length(max = 50))]
    pub room: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ScheduleFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_section_id: Option<Uuid>,
}

/// Date range for the calendar view; defaults to the current week.
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CalendarQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// A schedule row joined with the section and course it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithSection {
    pub schedule_id: ScheduleId,
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_code: String,
    pub course_name: String,
    pub lecturer_name: Option<String>,
    pub room: Option<String>,
    pub weekday: i16,
    pub start_period: i16,
    pub period_count: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SessionWithSection {
    pub fn slot(&self) -> SessionSlot {
        SessionSlot {
            weekday: self.weekday,
            start_period: self.start_period,
            period_count: self.period_count,
        }
    }
}

/// One dated occurrence of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalendarEvent {
    pub schedule_id: ScheduleId,
    pub class_section_id: ClassSectionId,
    pub class_section_code: String,
    pub course_code: String,
    pub course_name: String,
    pub lecturer_name: Option<String>,
    pub room: Option<String>,
    pub weekday: i16,
    pub start_period: i16,
    pub period_count: i16,
    #[schema(value_type = String, example = "2026-10-12T07:00:00")]
    pub starts_at: NaiveDateTime,
    #[schema(value_type = String, example = "2026-10-12T09:30:00")]
    pub ends_at: NaiveDateTime,
}

impl CalendarEvent {
    pub fn from_session(
        session: &SessionWithSection,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Self {
        Self {
            schedule_id: session.schedule_id,
            class_section_id: session.class_section_id,
            class_section_code: session.class_section_code.clone(),
            course_code: session.course_code.clone(),
            course_name: session.course_name.clone(),
            lecturer_name: session.lecturer_name.clone(),
            room: session.room.clone(),
            weekday: session.weekday,
            start_period: session.start_period,
            period_count: session.period_count,
            starts_at,
            ends_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarWeek {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub weeks: Vec<CalendarWeek>,
}
