mod availability;
mod booking;
mod slots;

#[cfg(test)]
mod slots_tests;

pub use availability::{day_slots, next_slots};
pub use booking::{book_appointment, parse_interval, reschedule_appointment};
pub use slots::{compute_day_slots, parse_day, working_window, Slot, TimeRange};
