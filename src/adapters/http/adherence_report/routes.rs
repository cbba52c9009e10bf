//! Routes for the adherence report.

use axum::routing::get;
use axum::Router;

use super::handlers::get_adherence_report;
use crate::adapters::http::AppState;

pub fn adherence_routes() -> Router<AppState> {
    Router::new().route("/api/patients/:patient_id/adherence", get(get_adherence_report))
}
