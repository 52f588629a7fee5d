use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    config,
    db::{BookAppointmentPayload, NewAppointment, Service},
    error::{AppError, AppResult},
    scheduling::{self, Slot},
};

#[derive(Debug, Deserialize)]
pub struct DaySlotsParams {
    pub date: String,
    pub service_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct NextSlotsParams {
    pub service_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub slots: Vec<Slot>,
}

pub async fn list_services(State(state): State<AppState>) -> Json<Vec<Service>> {
    Json(state.services.current())
}

pub async fn day_slots(
    State(state): State<AppState>,
    Query(params): Query<DaySlotsParams>,
) -> AppResult<Json<SlotsResponse>> {
    let date = scheduling::parse_day(&params.date)
        .map_err(|_| AppError::Validation("date must be formatted YYYY-MM-DD".into()))?;
    let service = lookup_service(&state, params.service_id)?;

    let slots = scheduling::day_slots(
        &state.db,
        &config::get().booking,
        &service,
        date,
        OffsetDateTime::now_utc(),
    )
    .await?;

    Ok(Json(SlotsResponse { slots }))
}

pub async fn next_slots(
    State(state): State<AppState>,
    Query(params): Query<NextSlotsParams>,
) -> AppResult<Json<SlotsResponse>> {
    let service = lookup_service(&state, params.service_id)?;

    let slots = scheduling::next_slots(
        &state.db,
        &config::get().booking,
        &service,
        OffsetDateTime::now_utc(),
    )
    .await?;

    Ok(Json(SlotsResponse { slots }))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<BookAppointmentPayload>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let (start_time, end_time) = scheduling::parse_interval(&payload.start, &payload.end)?;
    let service = lookup_service(&state, payload.service_id)?;

    let new_appointment = NewAppointment {
        title: format!("{} - {}", service.title, payload.title.trim()),
        start_time,
        end_time,
        phone: payload.phone,
        service_id: Some(service.id),
    };

    let appointment = scheduling::book_appointment(&state.db, &new_appointment).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": appointment.id }))))
}

fn lookup_service(state: &AppState, service_id: Uuid) -> Result<Service, AppError> {
    state
        .services
        .find(service_id)
        .ok_or_else(|| AppError::NotFound("unknown service".into()))
}
