//! HTTP adapters - REST API.
//!
//! Each area has its own dto/handlers/routes module. The acting therapist is
//! taken from the `x-therapist-id` header on mutating routes.

pub mod action_plans;
pub mod adherence_report;
pub mod error;
pub mod extract;
pub mod phase_gate;
mod state;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub use error::{ApiError, ErrorResponse};
pub use extract::{ActingTherapist, THERAPIST_HEADER};
pub use state::AppState;

/// Builds the API router with every endpoint and `/health`.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(phase_gate::phase_routes())
        .merge(adherence_report::adherence_routes())
        .merge(action_plans::action_plan_routes())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
