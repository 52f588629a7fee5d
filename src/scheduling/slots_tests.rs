use test_case::test_case;
use time::macros::{date, datetime, time};
use time::{Duration, Time};

use super::slots::{compute_day_slots, parse_day, Slot, TimeRange};
use crate::db::WorkingHours;

// A Monday with ordinary opening hours, observed from far enough in the
// past that no candidate is filtered as "already gone".
const MONDAY: time::Date = date!(2025-06-02);
const LONG_AGO: time::OffsetDateTime = datetime!(2000-01-01 0:00 UTC);

fn open_between(open: Time, close: Time) -> WorkingHours {
    WorkingHours {
        day_of_week: 1,
        open_time: Some(open),
        close_time: Some(close),
    }
}

fn booked(start: time::OffsetDateTime, end: time::OffsetDateTime) -> TimeRange {
    TimeRange { start, end }
}

#[test]
fn a_day_without_hours_is_closed() {
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        None,
        &[],
        LONG_AGO,
        Duration::minutes(15),
    );
    assert!(slots.is_empty());
}

#[test]
fn a_day_with_null_bounds_is_closed() {
    let closed = WorkingHours {
        day_of_week: 1,
        open_time: None,
        close_time: None,
    };
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&closed),
        &[],
        LONG_AGO,
        Duration::minutes(15),
    );
    assert!(slots.is_empty());
}

#[test_case(time!(11:00), time!(19:00), 30, 30, 16 ; "half hour service on a half hour grid")]
#[test_case(time!(11:00), time!(19:00), 60, 30, 15 ; "one hour service on a half hour grid")]
#[test_case(time!(11:00), time!(19:00), 30, 15, 31 ; "half hour service on a quarter hour grid")]
#[test_case(time!(9:00), time!(10:00), 90, 15, 0 ; "service longer than the whole window")]
fn slot_counts_for_an_empty_calendar(
    open: Time,
    close: Time,
    duration_minutes: i64,
    grid_minutes: i64,
    expected: usize,
) {
    let hours = open_between(open, close);
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(duration_minutes),
        Some(&hours),
        &[],
        LONG_AGO,
        Duration::minutes(grid_minutes),
    );
    assert_eq!(slots.len(), expected);
}

#[test]
fn the_last_slot_ends_exactly_at_closing() {
    let hours = open_between(time!(11:00), time!(19:00));
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&hours),
        &[],
        LONG_AGO,
        Duration::minutes(30),
    );

    assert_eq!(slots.first().map(|s| s.start), Some(datetime!(2025-06-02 11:00 UTC)));
    assert_eq!(slots.last().map(|s| s.start), Some(datetime!(2025-06-02 18:30 UTC)));
    assert_eq!(slots.last().map(|s| s.end), Some(datetime!(2025-06-02 19:00 UTC)));
    // No candidate may spill past the closing time.
    assert!(slots.iter().all(|s| s.end <= datetime!(2025-06-02 19:00 UTC)));
}

#[test]
fn candidates_in_the_past_are_dropped() {
    let hours = open_between(time!(11:00), time!(19:00));
    let now = datetime!(2025-06-02 14:05 UTC);
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&hours),
        &[],
        now,
        Duration::minutes(15),
    );

    assert_eq!(slots.first().map(|s| s.start), Some(datetime!(2025-06-02 14:15 UTC)));
    assert!(slots.iter().all(|s| s.start >= now));
}

#[test]
fn booked_intervals_shadow_their_grid_neighbourhood() {
    let hours = open_between(time!(11:00), time!(19:00));
    let taken = booked(
        datetime!(2025-06-02 14:00 UTC),
        datetime!(2025-06-02 14:30 UTC),
    );
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&hours),
        &[taken],
        LONG_AGO,
        Duration::minutes(15),
    );

    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    // Starting at 13:45, 14:00 or 14:15 would cut into the booking.
    assert!(!starts.contains(&datetime!(2025-06-02 13:45 UTC)));
    assert!(!starts.contains(&datetime!(2025-06-02 14:00 UTC)));
    assert!(!starts.contains(&datetime!(2025-06-02 14:15 UTC)));
    // Touching intervals are fine on both sides.
    assert!(starts.contains(&datetime!(2025-06-02 13:30 UTC)));
    assert!(starts.contains(&datetime!(2025-06-02 14:30 UTC)));
}

#[test]
fn a_booking_straddling_the_opening_shadows_early_slots() {
    let hours = open_between(time!(9:00), time!(12:00));
    let taken = booked(
        datetime!(2025-06-02 8:00 UTC),
        datetime!(2025-06-02 9:30 UTC),
    );
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&hours),
        &[taken],
        LONG_AGO,
        Duration::minutes(15),
    );

    assert_eq!(slots.first().map(|s| s.start), Some(datetime!(2025-06-02 9:30 UTC)));
}

#[test]
fn a_booking_covering_the_whole_window_leaves_nothing() {
    let hours = open_between(time!(9:00), time!(12:00));
    let taken = booked(
        datetime!(2025-06-01 0:00 UTC),
        datetime!(2025-06-03 0:00 UTC),
    );
    let slots = compute_day_slots(
        MONDAY,
        Duration::minutes(30),
        Some(&hours),
        &[taken],
        LONG_AGO,
        Duration::minutes(15),
    );
    assert!(slots.is_empty());
}

#[test]
fn results_are_ordered_sized_and_reproducible() {
    let hours = open_between(time!(11:00), time!(19:00));
    let taken = [
        booked(
            datetime!(2025-06-02 12:00 UTC),
            datetime!(2025-06-02 12:45 UTC),
        ),
        booked(
            datetime!(2025-06-02 16:30 UTC),
            datetime!(2025-06-02 17:00 UTC),
        ),
    ];
    let duration = Duration::minutes(30);

    let first = compute_day_slots(
        MONDAY,
        duration,
        Some(&hours),
        &taken,
        LONG_AGO,
        Duration::minutes(15),
    );
    let second = compute_day_slots(
        MONDAY,
        duration,
        Some(&hours),
        &taken,
        LONG_AGO,
        Duration::minutes(15),
    );

    // Pure function of its inputs.
    assert_eq!(first, second);
    assert!(first.windows(2).all(|pair| pair[0].start < pair[1].start));
    assert!(first.iter().all(|s| s.end - s.start == duration));
    assert!(first
        .iter()
        .all(|s| !taken.iter().any(|t| s.start < t.end && s.end > t.start)));
}

#[test]
fn slots_serialize_as_rfc3339_timestamps() {
    let slot = Slot {
        start: datetime!(2025-06-02 11:00 UTC),
        end: datetime!(2025-06-02 11:30 UTC),
    };
    let json = serde_json::to_value(slot).unwrap();
    assert_eq!(json["start"], "2025-06-02T11:00:00Z");
    assert_eq!(json["end"], "2025-06-02T11:30:00Z");
}

#[test]
fn day_selectors_parse_and_reject() {
    assert_eq!(parse_day("2025-06-02").unwrap(), MONDAY);
    assert!(parse_day("02/06/2025").is_err());
    assert!(parse_day("2025-13-40").is_err());
    assert!(parse_day("").is_err());
}
