use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::app_state::AppState;
use super::handlers::{
    create_block, create_service, create_vacation, day_appointments, delete_appointment,
    delete_block, delete_service, list_blocks, list_hours, list_services, month_appointments,
    reschedule_appointment, update_service, upsert_hours,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(create_service))
        .route("/services/:id", put(update_service).delete(delete_service))
        .route("/day-appointments", get(day_appointments))
        .route("/month-appointments", post(month_appointments))
        .route(
            "/appointments/:id",
            put(reschedule_appointment).delete(delete_appointment),
        )
        .route("/blocks", get(list_blocks))
        .route("/block", post(create_block))
        .route("/vacation", post(create_vacation))
        .route("/blocks/:id", delete(delete_block))
        .route("/hours", get(list_hours).post(upsert_hours))
}
