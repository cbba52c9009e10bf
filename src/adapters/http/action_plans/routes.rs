//! Routes for action plan endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{add_task, create_action_plan, record_completion};
use crate::adapters::http::AppState;

pub fn action_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/patients/:patient_id/action-plans", post(create_action_plan))
        .route("/api/action-plans/:action_plan_id/tasks", post(add_task))
        .route("/api/tasks/:task_id/completions", post(record_completion))
}
