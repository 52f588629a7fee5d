use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use time::{Date, Duration};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    db::{
        Appointment, AppointmentRepository, BlockedInterval, BlockedIntervalRepository,
        BlockedKind, DayCount, NewBlockedInterval, NewService, ReschedulePayload, Service,
        ServiceRepository, UpdateServicePayload, UpsertWorkingHours, WorkingHours,
        WorkingHoursRepository,
    },
    error::{AppError, AppResult},
    scheduling,
};

// --- Services ---

pub async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.services.current())
}

pub async fn create_service(
    State(state): State<AppState>,
    Json(payload): Json<NewService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ServiceRepository::create(&state.db, &payload).await?;
    state.services.reload(&state.db).await?;

    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Json(payload): Json<UpdateServicePayload>,
) -> AppResult<Json<Service>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ServiceRepository::update(&state.db, service_id, &payload).await?;
    state.services.reload(&state.db).await?;

    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    ServiceRepository::delete(&state.db, service_id).await?;
    state.services.reload(&state.db).await?;

    Ok(Json(json!({ "success": true })))
}

// --- Appointments ---

#[derive(Debug, Deserialize)]
pub struct DayAppointmentsParams {
    pub day: String,
}

pub async fn day_appointments(
    State(state): State<AppState>,
    Query(params): Query<DayAppointmentsParams>,
) -> AppResult<Json<Vec<Appointment>>> {
    let day = parse_day_param(&params.day)?;
    let day_start = day.midnight().assume_utc();
    let day_end = day_start + Duration::days(1);

    let appointments = AppointmentRepository::list_for_day(&state.db, day_start, day_end).await?;
    Ok(Json(appointments))
}

#[derive(Debug, Deserialize)]
pub struct MonthAppointmentsPayload {
    pub days: Vec<String>,
}

pub async fn month_appointments(
    State(state): State<AppState>,
    Json(payload): Json<MonthAppointmentsPayload>,
) -> AppResult<Json<serde_json::Value>> {
    let days = payload
        .days
        .iter()
        .map(|label| Ok((label.clone(), parse_day_param(label)?)))
        .collect::<Result<Vec<_>, AppError>>()?;

    let dates: Vec<Date> = days.iter().map(|(_, date)| *date).collect();
    let counts = AppointmentRepository::count_per_day(&state.db, &dates).await?;

    Ok(Json(json!({ "day_counts": merge_day_counts(&days, &counts) })))
}

pub async fn reschedule_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<ReschedulePayload>,
) -> AppResult<Json<Appointment>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let (start, end) = scheduling::parse_interval(&payload.start, &payload.end)?;

    let appointment =
        scheduling::reschedule_appointment(&state.db, appointment_id, start, end).await?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    AppointmentRepository::delete(&state.db, appointment_id).await?;
    Ok(Json(json!({ "success": true })))
}

// --- Blocked intervals ---

pub async fn list_blocks(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BlockedInterval>>> {
    let blocks = BlockedIntervalRepository::list_all(&state.db).await?;
    Ok(Json(blocks))
}

pub async fn create_block(
    State(state): State<AppState>,
    Json(payload): Json<NewBlockedInterval>,
) -> AppResult<(StatusCode, Json<BlockedInterval>)> {
    create_blocked_interval(&state, payload, BlockedKind::Block, "").await
}

pub async fn create_vacation(
    State(state): State<AppState>,
    Json(payload): Json<NewBlockedInterval>,
) -> AppResult<(StatusCode, Json<BlockedInterval>)> {
    create_blocked_interval(&state, payload, BlockedKind::Vacation, "Vacances").await
}

async fn create_blocked_interval(
    state: &AppState,
    payload: NewBlockedInterval,
    kind: BlockedKind,
    default_reason: &str,
) -> AppResult<(StatusCode, Json<BlockedInterval>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let (start, end) = scheduling::parse_interval(&payload.start, &payload.end)?;
    let reason = payload.reason.unwrap_or_else(|| default_reason.to_string());

    let block = BlockedIntervalRepository::create(&state.db, start, end, &reason, kind).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn delete_block(
    State(state): State<AppState>,
    Path(block_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    BlockedIntervalRepository::delete(&state.db, block_id).await?;
    Ok(Json(json!({ "success": true })))
}

// --- Working hours ---

pub async fn list_hours(State(state): State<AppState>) -> AppResult<Json<Vec<WorkingHours>>> {
    let hours = WorkingHoursRepository::list_all(&state.db).await?;
    Ok(Json(hours))
}

pub async fn upsert_hours(
    State(state): State<AppState>,
    Json(payload): Json<UpsertWorkingHours>,
) -> AppResult<Json<WorkingHours>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let hours = WorkingHoursRepository::upsert(&state.db, &payload).await?;
    Ok(Json(hours))
}

// --- Helpers ---

fn parse_day_param(value: &str) -> Result<Date, AppError> {
    scheduling::parse_day(value)
        .map_err(|_| AppError::Validation(format!("'{value}' is not a YYYY-MM-DD day")))
}

/// Zero-fills the requested days so the calendar view gets an entry for
/// every day it asked about, keyed by the caller's own labels.
fn merge_day_counts(days: &[(String, Date)], counts: &[DayCount]) -> BTreeMap<String, i64> {
    days.iter()
        .map(|(label, date)| {
            let count = counts
                .iter()
                .find(|row| row.day == *date)
                .map(|row| row.count)
                .unwrap_or(0);
            (label.clone(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn day_counts_are_zero_filled_for_quiet_days() {
        let days = vec![
            ("2025-06-02".to_string(), date!(2025-06-02)),
            ("2025-06-03".to_string(), date!(2025-06-03)),
            ("2025-06-04".to_string(), date!(2025-06-04)),
        ];
        let counts = vec![DayCount {
            day: date!(2025-06-03),
            count: 4,
        }];

        let merged = merge_day_counts(&days, &counts);
        assert_eq!(merged.get("2025-06-02"), Some(&0));
        assert_eq!(merged.get("2025-06-03"), Some(&4));
        assert_eq!(merged.get("2025-06-04"), Some(&0));
    }
}
