//! HTTP adapter for the adherence report.

mod dto;
mod handlers;
mod routes;

pub use dto::{AdherenceReportParams, AdherenceReportResponse};
pub use routes::adherence_routes;
