mod service_repository;
mod appointment_repository;
mod blocked_interval_repository;
mod working_hours_repository;

pub use service_repository::ServiceRepository;
pub use appointment_repository::{AppointmentRepository, DayCount};
pub use blocked_interval_repository::BlockedIntervalRepository;
pub use working_hours_repository::WorkingHoursRepository;
