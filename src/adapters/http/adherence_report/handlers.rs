//! HTTP handler for the adherence report.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;

use super::dto::{AdherenceReportParams, AdherenceReportResponse};
use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::AppState;
use crate::application::GetAdherenceReportQuery;
use crate::domain::foundation::PatientId;

/// GET /api/patients/:patient_id/adherence?as_of=YYYY-MM-DD
pub async fn get_adherence_report(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    Query(params): Query<AdherenceReportParams>,
) -> Result<impl IntoResponse, ApiError> {
    let patient_id: PatientId = parse_path(&patient_id, "patient ID")?;
    let as_of = params
        .as_of
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("Invalid as_of date: {}", raw)))
        })
        .transpose()?;

    let report = state
        .adherence_report_handler()
        .handle(GetAdherenceReportQuery { patient_id, as_of })
        .await?;

    tracing::debug!(
        patient_id = %patient_id,
        tasks = report.task_adherence.len(),
        "Adherence report served"
    );

    Ok(Json(AdherenceReportResponse::from(report)))
}
