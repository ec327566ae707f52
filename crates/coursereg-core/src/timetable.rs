//! Weekly timetable arithmetic.
//!
//! Teaching happens in fixed 50-minute periods ("tiết"); period 1 starts at
//! 07:00 and periods follow each other back to back, so period `n` starts at
//! `07:00 + (n - 1) × 50 min`.
//!
//! Days use the Vietnamese numbering: "Thứ 2" (Monday) is code 2 through
//! "Thứ 7" (Saturday) code 7, and Sunday ("Chủ nhật") is code 8.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub const DAY_START_HOUR: u32 = 7;
pub const PERIOD_MINUTES: i64 = 50;
pub const MAX_PERIOD: i16 = 15;
pub const MAX_PERIODS_PER_SESSION: i16 = 6;

pub const MONDAY: i16 = 2;
pub const SUNDAY: i16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    InvalidWeekday(i16),
    InvalidStartPeriod(i16),
    InvalidPeriodCount(i16),
    PastLastPeriod { start_period: i16, period_count: i16 },
}

impl fmt::Display for TimetableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimetableError::InvalidWeekday(code) => write!(
                f,
                "Weekday must be between {} (Monday) and {} (Sunday), got {}",
                MONDAY, SUNDAY, code
            ),
            TimetableError::InvalidStartPeriod(p) => {
                write!(f, "Start period must be between 1 and {}, got {}", MAX_PERIOD, p)
            }
            TimetableError::InvalidPeriodCount(c) => write!(
                f,
                "Period count must be between 1 and {}, got {}",
                MAX_PERIODS_PER_SESSION, c
            ),
            TimetableError::PastLastPeriod {
                start_period,
                period_count,
            } => write!(
                f,
                "Session starting at period {} with {} periods runs past period {}",
                start_period, period_count, MAX_PERIOD
            ),
        }
    }
}

impl std::error::Error for TimetableError {}

fn day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(DAY_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Wall-clock start of a period. Periods below 1 are treated as period 1.
pub fn period_start_time(period: i16) -> NaiveTime {
    let period = i64::from(period.max(1));
    day_start() + Duration::minutes((period - 1) * PERIOD_MINUTES)
}

/// Wall-clock end of a session of `period_count` periods starting at
/// `start_period`. A count below 1 is treated as a single period.
pub fn period_end_time(start_period: i16, period_count: i16) -> NaiveTime {
    let count = i64::from(period_count.max(1));
    period_start_time(start_period) + Duration::minutes(count * PERIOD_MINUTES)
}

/// Days after Monday for a weekday code, `None` for unknown codes.
pub fn weekday_offset(code: i16) -> Option<i64> {
    if (MONDAY..=SUNDAY).contains(&code) {
        Some(i64::from(code - MONDAY))
    } else {
        None
    }
}

/// Weekday code of a calendar date.
pub fn weekday_code(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_monday() as i16 + MONDAY
}

/// Monday of the ISO week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// A weekly recurring teaching slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSlot {
    pub weekday: i16,
    pub start_period: i16,
    pub period_count: i16,
}

impl SessionSlot {
    pub fn new(weekday: i16, start_period: i16, period_count: i16) -> Result<Self, TimetableError> {
        let slot = Self {
            weekday,
            start_period,
            period_count,
        };
        slot.validate()?;
        Ok(slot)
    }

    pub fn validate(&self) -> Result<(), TimetableError> {
        if weekday_offset(self.weekday).is_none() {
            return Err(TimetableError::InvalidWeekday(self.weekday));
        }
        if !(1..=MAX_PERIOD).contains(&self.start_period) {
            return Err(TimetableError::InvalidStartPeriod(self.start_period));
        }
        if !(1..=MAX_PERIODS_PER_SESSION).contains(&self.period_count) {
            return Err(TimetableError::InvalidPeriodCount(self.period_count));
        }
        if self.last_period() > MAX_PERIOD {
            return Err(TimetableError::PastLastPeriod {
                start_period: self.start_period,
                period_count: self.period_count,
            });
        }
        Ok(())
    }

    pub fn last_period(&self) -> i16 {
        self.start_period + self.period_count.max(1) - 1
    }

    pub fn start_time(&self) -> NaiveTime {
        period_start_time(self.start_period)
    }

    pub fn end_time(&self) -> NaiveTime {
        period_end_time(self.start_period, self.period_count)
    }

    /// The slot's date in the week starting at `monday`.
    pub fn date_in_week(&self, monday: NaiveDate) -> Option<NaiveDate> {
        weekday_offset(self.weekday).map(|offset| monday + Duration::days(offset))
    }

    /// Start and end instants of the slot in the week starting at `monday`.
    pub fn occurrence_on_week(&self, monday: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.date_in_week(monday)
            .map(|date| (date.and_time(self.start_time()), date.and_time(self.end_time())))
    }

    pub fn overlaps(&self, other: &SessionSlot) -> bool {
        self.weekday == other.weekday
            && self.start_period <= other.last_period()
            && other.start_period <= self.last_period()
    }
}

/// Whether two weekly slots collide on the same day and period range.
pub fn slots_overlap(a: &SessionSlot, b: &SessionSlot) -> bool {
    a.overlaps(b)
}

/// Inclusive date-range intersection.
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Every occurrence of `slot` whose date lies in `[from, to]`.
pub fn expand_weekly(
    slot: &SessionSlot,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<(NaiveDateTime, NaiveDateTime)> {
    let mut occurrences = Vec::new();
    if from > to {
        return occurrences;
    }

    let mut monday = monday_of(from);
    while monday <= to {
        if let Some(date) = slot.date_in_week(monday)
            && date >= from
            && date <= to
            && let Some(occurrence) = slot.occurrence_on_week(monday)
        {
            occurrences.push(occurrence);
        }
        monday += Duration::weeks(1);
    }

    occurrences
}

/// Groups events by the Monday of the week they start in, ordered by start
/// inside each week.
pub fn group_by_week<T, F>(events: Vec<T>, start_of: F) -> BTreeMap<NaiveDate, Vec<T>>
where
    F: Fn(&T) -> NaiveDateTime,
{
    let mut weeks: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for event in events {
        let monday = monday_of(start_of(&event).date());
        weeks.entry(monday).or_default().push(event);
    }
    for events in weeks.values_mut() {
        events.sort_by_key(|e| start_of(e));
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_period_start_times() {
        assert_eq!(period_start_time(1), time(7, 0));
        assert_eq!(period_start_time(2), time(7, 50));
        assert_eq!(period_start_time(6), time(11, 10));
        assert_eq!(period_start_time(15), time(18, 40));
    }

    #[test]
    fn test_missing_period_defaults_to_first() {
        assert_eq!(period_start_time(0), time(7, 0));
        assert_eq!(period_end_time(1, 0), time(7, 50));
    }

    #[test]
    fn test_period_end_times() {
        assert_eq!(period_end_time(1, 3), time(9, 30));
        assert_eq!(period_end_time(7, 2), time(13, 40));
    }

    #[test]
    fn test_weekday_offsets() {
        assert_eq!(weekday_offset(2), Some(0));
        assert_eq!(weekday_offset(7), Some(5));
        assert_eq!(weekday_offset(8), Some(6));
        assert_eq!(weekday_offset(1), None);
        assert_eq!(weekday_offset(9), None);
    }

    #[test]
    fn test_weekday_code_and_monday() {
        // 2026-10-16 is a Friday
        assert_eq!(weekday_code(date(2026, 10, 16)), 6);
        assert_eq!(weekday_code(date(2026, 10, 18)), SUNDAY);
        assert_eq!(monday_of(date(2026, 10, 16)), date(2026, 10, 12));
        assert_eq!(monday_of(date(2026, 10, 12)), date(2026, 10, 12));
        assert_eq!(monday_of(date(2026, 10, 18)), date(2026, 10, 12));
    }

    #[test]
    fn test_slot_validation() {
        assert!(SessionSlot::new(2, 1, 3).is_ok());
        assert_eq!(
            SessionSlot::new(1, 1, 3),
            Err(TimetableError::InvalidWeekday(1))
        );
        assert_eq!(
            SessionSlot::new(3, 16, 1),
            Err(TimetableError::InvalidStartPeriod(16))
        );
        assert_eq!(
            SessionSlot::new(3, 1, 7),
            Err(TimetableError::InvalidPeriodCount(7))
        );
        assert_eq!(
            SessionSlot::new(3, 14, 3),
            Err(TimetableError::PastLastPeriod {
                start_period: 14,
                period_count: 3
            })
        );
    }

    #[test]
    fn test_occurrence_on_week() {
        let slot = SessionSlot::new(4, 4, 3).unwrap(); // Wednesday, periods 4-6
        let (start, end) = slot.occurrence_on_week(date(2026, 10, 12)).unwrap();
        assert_eq!(start, date(2026, 10, 14).and_time(time(9, 30)));
        assert_eq!(end, date(2026, 10, 14).and_time(time(12, 0)));
    }

    #[test]
    fn test_overlaps() {
        let a = SessionSlot::new(2, 1, 3).unwrap();
        let b = SessionSlot::new(2, 3, 2).unwrap();
        let c = SessionSlot::new(2, 4, 2).unwrap();
        let d = SessionSlot::new(3, 1, 3).unwrap();
        assert!(slots_overlap(&a, &b));
        assert!(slots_overlap(&b, &a));
        assert!(!slots_overlap(&a, &c));
        assert!(!slots_overlap(&a, &d));
    }

    #[test]
    fn test_date_ranges_overlap() {
        assert!(date_ranges_overlap(
            date(2026, 9, 1),
            date(2026, 12, 1),
            date(2026, 12, 1),
            date(2027, 1, 1)
        ));
        assert!(!date_ranges_overlap(
            date(2026, 9, 1),
            date(2026, 11, 30),
            date(2026, 12, 1),
            date(2027, 1, 1)
        ));
    }

    #[test]
    fn test_expand_weekly_respects_bounds() {
        let slot = SessionSlot::new(2, 1, 2).unwrap(); // Mondays
        // Tuesday 2026-10-13 through Monday 2026-10-26
        let occurrences = expand_weekly(&slot, date(2026, 10, 13), date(2026, 10, 26));
        let dates: Vec<NaiveDate> = occurrences.iter().map(|(s, _)| s.date()).collect();
        assert_eq!(dates, vec![date(2026, 10, 19), date(2026, 10, 26)]);
    }

    #[test]
    fn test_expand_weekly_empty_range() {
        let slot = SessionSlot::new(8, 1, 1).unwrap();
        assert!(expand_weekly(&slot, date(2026, 10, 20), date(2026, 10, 10)).is_empty());
        // Monday to Saturday contains no Sunday
        assert!(expand_weekly(&slot, date(2026, 10, 12), date(2026, 10, 17)).is_empty());
    }

    #[test]
    fn test_group_by_week() {
        let events = vec![
            date(2026, 10, 21).and_time(time(7, 0)),
            date(2026, 10, 14).and_time(time(9, 30)),
            date(2026, 10, 12).and_time(time(13, 0)),
            date(2026, 10, 18).and_time(time(7, 0)),
        ];
        let weeks = group_by_week(events, |e| *e);
        let keys: Vec<NaiveDate> = weeks.keys().copied().collect();
        assert_eq!(keys, vec![date(2026, 10, 12), date(2026, 10, 19)]);
        assert_eq!(weeks[&date(2026, 10, 12)].len(), 3);
        assert_eq!(
            weeks[&date(2026, 10, 12)][0],
            date(2026, 10, 12).and_time(time(13, 0))
        );
        assert_eq!(weeks[&date(2026, 10, 19)].len(), 1);
    }
}
