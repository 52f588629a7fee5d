use serde::Serialize;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time};

use crate::db::WorkingHours;

/// A half-open interval [start, end) that is already taken on the
/// calendar, whether by an appointment or by a blocked period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct TimeRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeRange {
    /// Half-open overlap: touching endpoints do not collide, so a slot
    /// ending exactly when an appointment starts stays bookable.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// A bookable candidate interval of exactly one service's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
}

/// Calendar day selector at the boundary, `YYYY-MM-DD` in the business
/// timezone (UTC).
pub fn parse_day(value: &str) -> Result<Date, time::error::Parse> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format)
}

/// The [open, close) window of a given date as absolute timestamps.
pub fn working_window(date: Date, open: Time, close: Time) -> TimeRange {
    TimeRange {
        start: date.with_time(open).assume_utc(),
        end: date.with_time(close).assume_utc(),
    }
}

/// Enumerates the open slots of one calendar day.
///
/// Candidate starts are walked from the opening time in `grid_step`
/// increments. A candidate survives when it fits before closing, does not
/// start in the past, and overlaps none of `booked`. A missing weekday row
/// or a NULL bound means the day is closed and yields an empty result.
///
/// The result is ordered by start time and recomputed fresh on every call;
/// it reflects whatever calendar state the caller fetched.
pub fn compute_day_slots(
    date: Date,
    duration: Duration,
    hours: Option<&WorkingHours>,
    booked: &[TimeRange],
    now: OffsetDateTime,
    grid_step: Duration,
) -> Vec<Slot> {
    let (open, close) = match hours {
        Some(h) => match (h.open_time, h.close_time) {
            (Some(open), Some(close)) => (open, close),
            _ => return Vec::new(),
        },
        None => return Vec::new(),
    };
    let window = working_window(date, open, close);

    let mut slots = Vec::new();
    let mut cursor = window.start;
    while cursor < window.end {
        let candidate = TimeRange {
            start: cursor,
            end: cursor + duration,
        };

        // Every later candidate would also cross closing time.
        if candidate.end > window.end {
            break;
        }

        if candidate.start >= now && !booked.iter().any(|taken| candidate.overlaps(taken)) {
            slots.push(Slot {
                start: candidate.start,
                end: candidate.end,
            });
        }

        cursor += grid_step;
    }

    slots
}
