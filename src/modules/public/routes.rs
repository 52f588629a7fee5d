use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use super::handlers::{create_appointment, day_slots, list_services, next_slots};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route("/timeslots/day", get(day_slots))
        .route("/timeslots/next-five", get(next_slots))
        .route("/appointments", post(create_appointment))
}
