//! Request and response bodies for the adherence report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adapters::http::phase_gate::PhaseAccessResponse;
use crate::domain::adherence::PlanAdherence;
use crate::domain::foundation::Timestamp;
use crate::domain::report::{AdherenceReport, TaskAdherence};

/// Query string of the report endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdherenceReportParams {
    /// `YYYY-MM-DD`; today in the configured offset when absent.
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdherenceReportResponse {
    pub patient_id: String,
    pub as_of: NaiveDate,
    pub generated_at: Timestamp,
    pub phases: Vec<PhaseAccessResponse>,
    pub task_adherence: Vec<TaskAdherence>,
    pub plan_adherence: Vec<PlanAdherence>,
}

impl From<AdherenceReport> for AdherenceReportResponse {
    fn from(report: AdherenceReport) -> Self {
        Self {
            patient_id: report.patient_id.to_string(),
            as_of: report.as_of,
            generated_at: report.generated_at,
            phases: report.phases.iter().map(PhaseAccessResponse::from).collect(),
            task_adherence: report.task_adherence,
            plan_adherence: report.plan_adherence,
        }
    }
}
