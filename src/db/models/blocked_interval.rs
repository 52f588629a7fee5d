use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "blocked_kind", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockedKind {
    Block,
    Vacation,
}

/// Administrator-declared unavailability. Interchangeable with a booked
/// appointment for the overlap tests; `kind` only affects display.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BlockedInterval {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub reason: String,
    pub kind: BlockedKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewBlockedInterval {
    #[validate(length(min = 1, message = "Start time is required"))]
    pub start: String,
    #[validate(length(min = 1, message = "End time is required"))]
    pub end: String,
    pub reason: Option<String>,
}
