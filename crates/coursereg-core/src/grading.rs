//! Grade computation.
//!
//! A class-section grade has three components on a 0–10 scale. The total is
//! the weighted sum
//!
//! ```text
//! total = 0.2 × attendance + 0.3 × midterm + 0.5 × final
//! ```
//!
//! rounded to one decimal. The total falls into one of five bands:
//!
//! | total      | letter | classification  | 4-point |
//! |------------|--------|-----------------|---------|
//! | ≥ 8.5      | A      | Giỏi            | 4.0     |
//! | ≥ 7.0      | B      | Khá             | 3.0     |
//! | ≥ 5.5      | C      | Trung bình      | 2.0     |
//! | ≥ 4.0      | D      | Trung bình yếu  | 1.0     |
//! | otherwise  | F      | Kém             | 0.0     |
//!
//! Components that have not been entered yet count as 0.
//!
//! Arithmetic is done on integer hundredths so that values such as 8.05
//! round to 8.1 instead of falling to 8.0 through binary floating point.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ATTENDANCE_WEIGHT: f64 = 0.2;
pub const MIDTERM_WEIGHT: f64 = 0.3;
pub const FINAL_WEIGHT: f64 = 0.5;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

// Weights expressed in tenths, used by the integer path.
const ATTENDANCE_TENTHS: i64 = 2;
const MIDTERM_TENTHS: i64 = 3;
const FINAL_TENTHS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeComponent {
    Attendance,
    Midterm,
    Final,
}

impl fmt::Display for GradeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GradeComponent::Attendance => "attendance",
            GradeComponent::Midterm => "midterm",
            GradeComponent::Final => "final_exam",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradingError {
    OutOfRange { component: GradeComponent, value: f64 },
    NotFinite { component: GradeComponent },
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingError::OutOfRange { component, value } => write!(
                f,
                "{} score {} is outside the range {}-{}",
                component, value, MIN_SCORE, MAX_SCORE
            ),
            GradingError::NotFinite { component } => {
                write!(f, "{} score must be a number", component)
            }
        }
    }
}

impl std::error::Error for GradingError {}

/// Letter band of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub const ALL: [LetterGrade; 5] = [
        LetterGrade::A,
        LetterGrade::B,
        LetterGrade::C,
        LetterGrade::D,
        LetterGrade::F,
    ];

    /// Band of a raw total. No rounding is applied, so `8.45` is a `B`.
    pub fn from_total(total: f64) -> Self {
        match total {
            t if t >= 8.5 => LetterGrade::A,
            t if t >= 7.0 => LetterGrade::B,
            t if t >= 5.5 => LetterGrade::C,
            t if t >= 4.0 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }

    fn from_tenths(tenths: i64) -> Self {
        match tenths {
            t if t >= 85 => LetterGrade::A,
            t if t >= 70 => LetterGrade::B,
            t if t >= 55 => LetterGrade::C,
            t if t >= 40 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }

    pub fn classification(&self) -> &'static str {
        match self {
            LetterGrade::A => "Giỏi",
            LetterGrade::B => "Khá",
            LetterGrade::C => "Trung bình",
            LetterGrade::D => "Trung bình yếu",
            LetterGrade::F => "Kém",
        }
    }

    pub fn grade_point(&self) -> f64 {
        match self {
            LetterGrade::A => 4.0,
            LetterGrade::B => 3.0,
            LetterGrade::C => 2.0,
            LetterGrade::D => 1.0,
            LetterGrade::F => 0.0,
        }
    }

    pub fn is_passing(&self) -> bool {
        *self != LetterGrade::F
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" => Some(LetterGrade::A),
            "B" => Some(LetterGrade::B),
            "C" => Some(LetterGrade::C),
            "D" => Some(LetterGrade::D),
            "F" => Some(LetterGrade::F),
            _ => None,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed result for one student in one class section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSummary {
    pub total: f64,
    pub letter: LetterGrade,
    pub classification: &'static str,
    pub passed: bool,
}

impl GradeSummary {
    /// Validates the provided components and computes the summary.
    pub fn compute(
        attendance: Option<f64>,
        midterm: Option<f64>,
        final_exam: Option<f64>,
    ) -> Result<Self, GradingError> {
        validate_score(GradeComponent::Attendance, attendance)?;
        validate_score(GradeComponent::Midterm, midterm)?;
        validate_score(GradeComponent::Final, final_exam)?;

        let tenths = total_tenths(attendance, midterm, final_exam);
        let letter = LetterGrade::from_tenths(tenths);

        Ok(Self {
            total: tenths as f64 / 10.0,
            letter,
            classification: letter.classification(),
            passed: letter.is_passing(),
        })
    }
}

/// Checks that a provided component lies within `0.0..=10.0`.
pub fn validate_score(component: GradeComponent, value: Option<f64>) -> Result<(), GradingError> {
    match value {
        None => Ok(()),
        Some(v) if !v.is_finite() => Err(GradingError::NotFinite { component }),
        Some(v) if !(MIN_SCORE..=MAX_SCORE).contains(&v) => {
            Err(GradingError::OutOfRange { component, value: v })
        }
        Some(_) => Ok(()),
    }
}

/// Weighted total rounded to one decimal; missing components count as 0.
///
/// Inputs are not range-checked here; see [`GradeSummary::compute`].
pub fn compute_total(attendance: Option<f64>, midterm: Option<f64>, final_exam: Option<f64>) -> f64 {
    total_tenths(attendance, midterm, final_exam) as f64 / 10.0
}

/// Rounds half away from zero to one decimal.
pub fn round_one_decimal(value: f64) -> f64 {
    to_tenths(value) as f64 / 10.0
}

/// Credit-weighted mean of `(score, credits)` pairs rounded to two decimals.
///
/// Returns `None` when the pairs carry no credits at all.
pub fn weighted_average<I>(items: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, i32)>,
{
    let (sum, credits) = items
        .into_iter()
        .filter(|(_, credits)| *credits > 0)
        .fold((0.0_f64, 0_i64), |(sum, total), (score, credits)| {
            (sum + score * credits as f64, total + credits as i64)
        });

    if credits == 0 {
        return None;
    }

    Some(((sum / credits as f64) * 100.0).round() / 100.0)
}

fn hundredths(value: Option<f64>) -> i64 {
    value.map(|v| (v * 100.0).round() as i64).unwrap_or(0)
}

fn total_tenths(attendance: Option<f64>, midterm: Option<f64>, final_exam: Option<f64>) -> i64 {
    // Weighted sum in thousandths of a point.
    let thousandths = ATTENDANCE_TENTHS * hundredths(attendance)
        + MIDTERM_TENTHS * hundredths(midterm)
        + FINAL_TENTHS * hundredths(final_exam);
    round_div(thousandths, 100)
}

fn to_tenths(value: f64) -> i64 {
    round_div((value * 100.0).round() as i64, 10)
}

fn round_div(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}
