//! Registration period (đợt đăng ký) models.

use chrono::{DateTime, Utc};
use coursereg_core::serde::deserialize_optional_string;
use coursereg_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::RegistrationPeriodId;

/// A registration window. `is_open` is evaluated by the database at read
/// time: `starts_at <= now() < ends_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RegistrationPeriod {
    pub id: RegistrationPeriodId,
    #[schema(example = "Đợt 1 - HK1 2026-2027")]
    pub name: String,
    #[schema(example = "2026-2027/1")]
    pub semester: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistrationPeriod {
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at < self.ends_at
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationPeriodDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub semester: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRegistrationPeriodDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub semester: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct RegistrationPeriodFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub semester: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedRegistrationPeriodsResponse {
    pub data: Vec<RegistrationPeriod>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_is_open_at_is_half_open() {
        let starts_at = Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap();
        let ends_at = starts_at + Duration::days(7);
        let period = RegistrationPeriod {
            id: RegistrationPeriodId::new(),
            name: "Đợt 1".to_string(),
            semester: "2026-2027/1".to_string(),
            starts_at,
            ends_at,
            is_open: false,
            created_at: starts_at,
            updated_at: starts_at,
        };

        assert!(period.is_open_at(starts_at));
        assert!(period.is_open_at(ends_at - Duration::seconds(1)));
        assert!(!period.is_open_at(ends_at));
        assert!(!period.is_open_at(starts_at - Duration::seconds(1)));
    }
}
