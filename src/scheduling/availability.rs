use sqlx::PgPool;
use time::{Date, OffsetDateTime};

use crate::config::BookingConfig;
use crate::db::{AppointmentRepository, BlockedIntervalRepository, Service, WorkingHoursRepository};
use crate::error::AppResult;

use super::slots::{compute_day_slots, working_window, Slot};

/// Open slots for `service` on one calendar day.
///
/// The calendar is read once per call: the weekday's hours row, then every
/// appointment and blocked interval intersecting the working window, with
/// the per-candidate filtering done in memory. The result can be stale the
/// moment it is produced; the booking transaction re-checks before writing.
pub async fn day_slots(
    pool: &PgPool,
    booking: &BookingConfig,
    service: &Service,
    date: Date,
    now: OffsetDateTime,
) -> AppResult<Vec<Slot>> {
    let weekday = i16::from(date.weekday().number_from_monday());
    let hours = WorkingHoursRepository::for_weekday(pool, weekday).await?;

    let window = match hours.as_ref().and_then(|h| h.open_time.zip(h.close_time)) {
        Some((open, close)) => working_window(date, open, close),
        None => return Ok(Vec::new()),
    };

    let mut booked =
        AppointmentRepository::overlapping_window(pool, window.start, window.end).await?;
    booked
        .extend(BlockedIntervalRepository::overlapping_window(pool, window.start, window.end).await?);

    Ok(compute_day_slots(
        date,
        service.duration(),
        hours.as_ref(),
        &booked,
        now,
        booking.grid_step(),
    ))
}

/// The next N open slots for `service`, walking forward day by day from
/// the current date. The scan is bounded by the configured horizon so an
/// empty calendar cannot make it run forever.
pub async fn next_slots(
    pool: &PgPool,
    booking: &BookingConfig,
    service: &Service,
    now: OffsetDateTime,
) -> AppResult<Vec<Slot>> {
    let mut collected = Vec::new();
    let mut date = now.date();

    for _ in 0..booking.search_horizon_days {
        if collected.len() >= booking.next_slots_count {
            break;
        }
        collected.extend(day_slots(pool, booking, service, date, now).await?);
        date = match date.next_day() {
            Some(next) => next,
            None => break,
        };
    }

    collected.truncate(booking.next_slots_count);
    Ok(collected)
}
