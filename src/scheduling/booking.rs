use sqlx::{PgPool, Postgres, Transaction};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{
    Appointment, AppointmentRepository, BlockedIntervalRepository, DatabaseError, NewAppointment,
};
use crate::error::{AppError, AppResult};

/// Parses an RFC 3339 timestamp pair from the boundary and enforces
/// `end > start`.
pub fn parse_interval(
    start: &str,
    end: &str,
) -> Result<(OffsetDateTime, OffsetDateTime), AppError> {
    let start = OffsetDateTime::parse(start, &Rfc3339)
        .map_err(|_| AppError::Validation("start is not a valid RFC 3339 timestamp".into()))?;
    let end = OffsetDateTime::parse(end, &Rfc3339)
        .map_err(|_| AppError::Validation("end is not a valid RFC 3339 timestamp".into()))?;

    if end <= start {
        return Err(AppError::Validation("end must be after start".into()));
    }
    Ok((start, end))
}

/// Commits a new appointment only if its interval is still free.
///
/// The slot list shown to the client is allowed to go stale, so two
/// racing requests for overlapping intervals are the expected case, not
/// an anomaly. Both conflict checks therefore run again inside a single
/// transaction that locks the calendar tables first; of two racers, one
/// commits and the other reads the fresh row and gets a conflict. There
/// is no server-side retry: the loser is told to pick another slot.
pub async fn book_appointment(
    pool: &PgPool,
    new_appointment: &NewAppointment,
) -> AppResult<Appointment> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;
    lock_calendar(&mut tx).await?;

    if AppointmentRepository::has_overlap(
        &mut tx,
        new_appointment.start_time,
        new_appointment.end_time,
        None,
    )
    .await?
    {
        tx.rollback().await.map_err(DatabaseError::from)?;
        return Err(AppError::Conflict(
            "this slot has just been booked, please pick another one".into(),
        ));
    }

    if BlockedIntervalRepository::has_overlap(
        &mut tx,
        new_appointment.start_time,
        new_appointment.end_time,
    )
    .await?
    {
        tx.rollback().await.map_err(DatabaseError::from)?;
        return Err(AppError::Conflict(
            "this slot is unavailable, please pick another one".into(),
        ));
    }

    let appointment = AppointmentRepository::insert(&mut tx, new_appointment).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    Ok(appointment)
}

/// Moves an existing appointment to a new interval under the same
/// conflict rule as booking, ignoring the appointment's own row.
pub async fn reschedule_appointment(
    pool: &PgPool,
    appointment_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> AppResult<Appointment> {
    let mut tx = pool.begin().await.map_err(DatabaseError::from)?;
    lock_calendar(&mut tx).await?;

    if AppointmentRepository::find_by_id(&mut tx, appointment_id)
        .await?
        .is_none()
    {
        tx.rollback().await.map_err(DatabaseError::from)?;
        return Err(AppError::NotFound("unknown appointment".into()));
    }

    if AppointmentRepository::has_overlap(&mut tx, start, end, Some(appointment_id)).await? {
        tx.rollback().await.map_err(DatabaseError::from)?;
        return Err(AppError::Conflict(
            "another appointment already occupies this interval".into(),
        ));
    }

    if BlockedIntervalRepository::has_overlap(&mut tx, start, end).await? {
        tx.rollback().await.map_err(DatabaseError::from)?;
        return Err(AppError::Conflict(
            "this interval is blocked, please pick another one".into(),
        ));
    }

    let appointment =
        AppointmentRepository::reschedule(&mut tx, appointment_id, start, end).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    Ok(appointment)
}

/// Serializes writers so the re-check-then-insert sequence is atomic with
/// respect to other booking transactions. Reads stay non-locking.
async fn lock_calendar(tx: &mut Transaction<'_, Postgres>) -> Result<(), DatabaseError> {
    sqlx::query("LOCK TABLE appointments, blocked_intervals IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_a_valid_interval() {
        let (start, end) =
            parse_interval("2025-06-02T14:00:00Z", "2025-06-02T14:30:00Z").unwrap();
        assert_eq!(start, datetime!(2025-06-02 14:00 UTC));
        assert_eq!(end, datetime!(2025-06-02 14:30 UTC));
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert!(matches!(
            parse_interval("2025-06-02", "2025-06-02T14:30:00Z"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_interval("2025-06-02T14:00:00Z", "not-a-date"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_an_empty_or_reversed_interval() {
        assert!(matches!(
            parse_interval("2025-06-02T14:00:00Z", "2025-06-02T14:00:00Z"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_interval("2025-06-02T14:30:00Z", "2025-06-02T14:00:00Z"),
            Err(AppError::Validation(_))
        ));
    }

    // The transactional properties need a real database underneath; these
    // run against DATABASE_URL with migrations applied.
    mod live {
        use super::super::*;
        use time::macros::datetime;

        async fn connect() -> PgPool {
            let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
            let pool = PgPool::connect(&url).await.expect("database unreachable");
            sqlx::query("DELETE FROM appointments")
                .execute(&pool)
                .await
                .unwrap();
            sqlx::query("DELETE FROM blocked_intervals")
                .execute(&pool)
                .await
                .unwrap();
            pool
        }

        fn request_for(start: OffsetDateTime, end: OffsetDateTime) -> NewAppointment {
            NewAppointment {
                title: "Tondeuse - Test".into(),
                start_time: start,
                end_time: end,
                phone: "0600000000".into(),
                service_id: None,
            }
        }

        #[tokio::test]
        #[ignore = "requires a running PostgreSQL with migrations applied"]
        async fn racing_bookings_for_the_same_interval_admit_exactly_one() {
            let pool = connect().await;
            let request = request_for(
                datetime!(2030-06-03 14:00 UTC),
                datetime!(2030-06-03 14:30 UTC),
            );

            let (first, second) = tokio::join!(
                book_appointment(&pool, &request),
                book_appointment(&pool, &request),
            );

            let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
            assert_eq!(successes, 1);

            let loser = if first.is_ok() { second } else { first };
            assert!(matches!(loser, Err(AppError::Conflict(_))));
        }

        #[tokio::test]
        #[ignore = "requires a running PostgreSQL with migrations applied"]
        async fn overlapping_interval_is_rejected_but_adjacent_one_is_not() {
            let pool = connect().await;
            book_appointment(
                &pool,
                &request_for(
                    datetime!(2030-06-03 14:00 UTC),
                    datetime!(2030-06-03 14:30 UTC),
                ),
            )
            .await
            .unwrap();

            let overlapping = book_appointment(
                &pool,
                &request_for(
                    datetime!(2030-06-03 14:15 UTC),
                    datetime!(2030-06-03 14:45 UTC),
                ),
            )
            .await;
            assert!(matches!(overlapping, Err(AppError::Conflict(_))));

            let back_to_back = book_appointment(
                &pool,
                &request_for(
                    datetime!(2030-06-03 14:30 UTC),
                    datetime!(2030-06-03 15:00 UTC),
                ),
            )
            .await;
            assert!(back_to_back.is_ok());
        }

        #[tokio::test]
        #[ignore = "requires a running PostgreSQL with migrations applied"]
        async fn booking_into_a_blocked_interval_conflicts() {
            let pool = connect().await;
            BlockedIntervalRepository::create(
                &pool,
                datetime!(2030-07-01 00:00 UTC),
                datetime!(2030-07-15 00:00 UTC),
                "Vacances",
                crate::db::BlockedKind::Vacation,
            )
            .await
            .unwrap();

            let result = book_appointment(
                &pool,
                &request_for(
                    datetime!(2030-07-03 10:00 UTC),
                    datetime!(2030-07-03 10:30 UTC),
                ),
            )
            .await;
            assert!(matches!(result, Err(AppError::Conflict(_))));
        }
    }
}
