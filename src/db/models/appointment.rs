use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub phone: String,
    pub service_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated, fully typed insert data. Built by the handlers after the
/// boundary payload has passed field validation and timestamp parsing.
#[derive(Debug)]
pub struct NewAppointment {
    pub title: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub phone: String,
    pub service_id: Option<Uuid>,
}

/// Public booking request as it arrives on the wire. Timestamps stay
/// strings here so a malformed value maps to a validation error instead
/// of a body rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct BookAppointmentPayload {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Start time is required"))]
    pub start: String,
    #[validate(length(min = 1, message = "End time is required"))]
    pub end: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    pub service_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReschedulePayload {
    #[validate(length(min = 1, message = "Start time is required"))]
    pub start: String,
    #[validate(length(min = 1, message = "End time is required"))]
    pub end: String,
}
