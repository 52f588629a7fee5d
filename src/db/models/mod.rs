mod service;
mod appointment;
mod blocked_interval;
mod working_hours;

pub use service::*;
pub use appointment::*;
pub use blocked_interval::*;
pub use working_hours::*;
