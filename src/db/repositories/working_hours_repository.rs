use sqlx::PgPool;

use crate::db::error::DatabaseError;
use crate::db::models::{UpsertWorkingHours, WorkingHours};

pub struct WorkingHoursRepository;

impl WorkingHoursRepository {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<WorkingHours>, DatabaseError> {
        let hours = sqlx::query_as::<_, WorkingHours>(
            r#"
            SELECT day_of_week, open_time, close_time
            FROM working_hours
            ORDER BY day_of_week
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(hours)
    }

    pub async fn for_weekday(
        pool: &PgPool,
        day_of_week: i16,
    ) -> Result<Option<WorkingHours>, DatabaseError> {
        let hours = sqlx::query_as::<_, WorkingHours>(
            r#"
            SELECT day_of_week, open_time, close_time
            FROM working_hours
            WHERE day_of_week = $1
            "#,
        )
        .bind(day_of_week)
        .fetch_optional(pool)
        .await?;

        Ok(hours)
    }

    /// Last write wins for a weekday.
    pub async fn upsert(
        pool: &PgPool,
        payload: &UpsertWorkingHours,
    ) -> Result<WorkingHours, DatabaseError> {
        let hours = sqlx::query_as::<_, WorkingHours>(
            r#"
            INSERT INTO working_hours (day_of_week, open_time, close_time)
            VALUES ($1, $2, $3)
            ON CONFLICT (day_of_week)
            DO UPDATE SET open_time = EXCLUDED.open_time, close_time = EXCLUDED.close_time
            RETURNING day_of_week, open_time, close_time
            "#,
        )
        .bind(payload.day_of_week)
        .bind(payload.open_time)
        .bind(payload.close_time)
        .fetch_one(pool)
        .await?;

        Ok(hours)
    }
}
