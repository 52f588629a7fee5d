use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{BlockedInterval, BlockedKind};
use crate::scheduling::TimeRange;

const BLOCK_COLUMNS: &str = "id, start_time, end_time, reason, kind, created_at";

pub struct BlockedIntervalRepository;

impl BlockedIntervalRepository {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<BlockedInterval>, DatabaseError> {
        let blocks = sqlx::query_as::<_, BlockedInterval>(&format!(
            "SELECT {BLOCK_COLUMNS} FROM blocked_intervals ORDER BY start_time DESC",
        ))
        .fetch_all(pool)
        .await?;

        Ok(blocks)
    }

    /// All blocked intervals intersecting [from, to), half-open.
    pub async fn overlapping_window(
        pool: &PgPool,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<TimeRange>, DatabaseError> {
        let ranges = sqlx::query_as::<_, TimeRange>(
            r#"
            SELECT start_time AS start, end_time AS "end"
            FROM blocked_intervals
            WHERE start_time < $2 AND end_time > $1
            ORDER BY start_time
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(ranges)
    }

    pub async fn has_overlap(
        tx: &mut Transaction<'_, Postgres>,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blocked_intervals
                WHERE start_time < $2 AND end_time > $1
            )
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&mut **tx)
        .await?;

        Ok(exists)
    }

    pub async fn create(
        pool: &PgPool,
        start: OffsetDateTime,
        end: OffsetDateTime,
        reason: &str,
        kind: BlockedKind,
    ) -> Result<BlockedInterval, DatabaseError> {
        let block = sqlx::query_as::<_, BlockedInterval>(&format!(
            r#"
            INSERT INTO blocked_intervals (start_time, end_time, reason, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING {BLOCK_COLUMNS}
            "#,
        ))
        .bind(start)
        .bind(end)
        .bind(reason)
        .bind(kind)
        .fetch_one(pool)
        .await?;

        Ok(block)
    }

    pub async fn delete(pool: &PgPool, block_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM blocked_intervals WHERE id = $1")
            .bind(block_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
