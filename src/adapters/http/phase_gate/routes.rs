//! Routes for phase gate endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{list_phases, lock_phase, toggle_phase, unlock_phase};
use crate::adapters::http::AppState;

pub fn phase_routes() -> Router<AppState> {
    Router::new()
        .route("/api/patients/:patient_id/phases", get(list_phases))
        .route("/api/patients/:patient_id/phases/:phase/toggle", post(toggle_phase))
        .route("/api/patients/:patient_id/phases/:phase/unlock", post(unlock_phase))
        .route("/api/patients/:patient_id/phases/:phase/lock", post(lock_phase))
}
