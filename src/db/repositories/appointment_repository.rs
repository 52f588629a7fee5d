use sqlx::{PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{Appointment, NewAppointment};
use crate::scheduling::TimeRange;

/// Appointments per calendar day, for the admin month view.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DayCount {
    pub day: Date,
    pub count: i64,
}

const APPOINTMENT_COLUMNS: &str = "id, title, start_time, end_time, phone, service_id, created_at";

pub struct AppointmentRepository;

impl AppointmentRepository {
    /// All appointment intervals intersecting [from, to), half-open.
    pub async fn overlapping_window(
        pool: &PgPool,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<TimeRange>, DatabaseError> {
        let ranges = sqlx::query_as::<_, TimeRange>(
            r#"
            SELECT start_time AS start, end_time AS "end"
            FROM appointments
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

    pub async fn list_for_day(
        pool: &PgPool,
        day_start: OffsetDateTime,
        day_end: OffsetDateTime,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointments
            WHERE start_time >= $1 AND start_time < $2
            ORDER BY start_time
            "#,
        ))
        .bind(day_start)
        .bind(day_end)
        .fetch_all(pool)
        .await?;

        Ok(appointments)
    }

    pub async fn count_per_day(
        pool: &PgPool,
        days: &[Date],
    ) -> Result<Vec<DayCount>, DatabaseError> {
        let counts = sqlx::query_as::<_, DayCount>(
            r#"
            SELECT (start_time AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
            FROM appointments
            WHERE (start_time AT TIME ZONE 'UTC')::date = ANY($1)
            GROUP BY day
            ORDER BY day
            "#,
        )
        .bind(days)
        .fetch_all(pool)
        .await?;

        Ok(counts)
    }

    /// Overlap re-check run inside the booking transaction. `exclude` skips
    /// one appointment's own row when rescheduling it.
    pub async fn has_overlap(
        tx: &mut Transaction<'_, Postgres>,
        start: OffsetDateTime,
        end: OffsetDateTime,
        exclude: Option<Uuid>,
    ) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM appointments
                WHERE start_time < $2 AND end_time > $1
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_one(&mut **tx)
        .await?;

        Ok(exists)
    }

    pub async fn find_by_id(
        tx: &mut Transaction<'_, Postgres>,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1",
        ))
        .bind(appointment_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(appointment)
    }

    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        new_appointment: &NewAppointment,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments (title, start_time, end_time, phone, service_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {APPOINTMENT_COLUMNS}
            "#,
        ))
        .bind(&new_appointment.title)
        .bind(new_appointment.start_time)
        .bind(new_appointment.end_time)
        .bind(&new_appointment.phone)
        .bind(new_appointment.service_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(appointment)
    }

    pub async fn reschedule(
        tx: &mut Transaction<'_, Postgres>,
        appointment_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Appointment, DatabaseError> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments
            SET start_time = $1, end_time = $2
            WHERE id = $3
            RETURNING {APPOINTMENT_COLUMNS}
            "#,
        ))
        .bind(start)
        .bind(end)
        .bind(appointment_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(DatabaseError::NotFound)
    }

    pub async fn delete(pool: &PgPool, appointment_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
