//! HTTP adapter for phase gate endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{PatientPhasesResponse, PhaseAccessResponse, PhaseChangeResponse};
pub use routes::phase_routes;
