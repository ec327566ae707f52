use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use coursereg_core::{AppError, PaginationMeta};
use coursereg_models::ids::RegistrationPeriodId;

use crate::modules::registration_periods::model::{
    CreateRegistrationPeriodDto, PaginatedRegistrationPeriodsResponse, RegistrationPeriod,
    RegistrationPeriodFilterParams, UpdateRegistrationPeriodDto,
};

const PERIOD_SELECT: &str = r#"SELECT id, name, semester, starts_at, ends_at,
       (starts_at <= NOW() AND NOW() < ends_at) AS is_open,
       created_at, updated_at
FROM registration_periods"#;

fn ensure_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if starts_at >= ends_at {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Registration period must start before it ends"
        )));
    }
    Ok(())
}

pub struct RegistrationPeriodService;

impl RegistrationPeriodService {
    #[instrument(skip(db))]
    pub async fn create_period(
        db: &PgPool,
        dto: CreateRegistrationPeriodDto,
    ) -> Result<RegistrationPeriod, AppError> {
        ensure_window(dto.starts_at, dto.ends_at)?;

        let id = sqlx::query_scalar::<_, RegistrationPeriodId>(
            r#"INSERT INTO registration_periods (name, semester, starts_at, ends_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(dto.name.trim())
        .bind(dto.semester.trim())
        .bind(dto.starts_at)
        .bind(dto.ends_at)
        .fetch_one(db)
        .await?;

        Self::get_period_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_periods(
        db: &PgPool,
        filters: RegistrationPeriodFilterParams,
    ) -> Result<PaginatedRegistrationPeriodsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registration_periods WHERE ($1::text IS NULL OR semester = $1)",
        )
        .bind(&filters.semester)
        .fetch_one(db)
        .await?;

        let periods = sqlx::query_as::<_, RegistrationPeriod>(&format!(
            "{} WHERE ($1::text IS NULL OR semester = $1) ORDER BY starts_at DESC LIMIT $2 OFFSET $3",
            PERIOD_SELECT
        ))
        .bind(&filters.semester)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedRegistrationPeriodsResponse {
            data: periods,
            meta: PaginationMeta::new(total, &filters.pagination),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_open_periods(db: &PgPool) -> Result<Vec<RegistrationPeriod>, AppError> {
        let periods = sqlx::query_as::<_, RegistrationPeriod>(&format!(
            "{} WHERE starts_at <= NOW() AND NOW() < ends_at ORDER BY ends_at",
            PERIOD_SELECT
        ))
        .fetch_all(db)
        .await?;

        Ok(periods)
    }

    #[instrument(skip(db))]
    pub async fn get_period_by_id(
        db: &PgPool,
        id: RegistrationPeriodId,
    ) -> Result<RegistrationPeriod, AppError> {
        sqlx::query_as::<_, RegistrationPeriod>(&format!("{} WHERE id = $1", PERIOD_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration period not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_period(
        db: &PgPool,
        id: RegistrationPeriodId,
        dto: UpdateRegistrationPeriodDto,
    ) -> Result<RegistrationPeriod, AppError> {
        let existing = Self::get_period_by_id(db, id).await?;

        let starts_at = dto.starts_at.unwrap_or(existing.starts_at);
        let ends_at = dto.ends_at.unwrap_or(existing.ends_at);
        ensure_window(starts_at, ends_at)?;

        sqlx::query(
            r#"UPDATE registration_periods
               SET name = COALESCE($2, name),
                   semester = COALESCE($3, semester),
                   starts_at = $4,
                   ends_at = $5,
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.semester.as_deref().map(str::trim))
        .bind(starts_at)
        .bind(ends_at)
        .execute(db)
        .await?;

        Self::get_period_by_id(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_period(db: &PgPool, id: RegistrationPeriodId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM registration_periods WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "Registration period still has class sections"
                    ));
                }
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Registration period not found"
            )));
        }

        Ok(())
    }
}
