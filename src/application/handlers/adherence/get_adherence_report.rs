//! GetAdherenceReportHandler - Query handler for the adherence dashboard.

use chrono::NaiveDate;
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;

use crate::application::handlers::phase::load_patient_phases;
use crate::application::StoreGuard;
use crate::domain::foundation::{DomainError, ErrorCode, PatientId, ValidationError};
use crate::domain::phase::PhaseGateError;
use crate::domain::report::{AdherenceReport, AdherenceReportAssembler, TaskCompletionLog};
use crate::ports::{ActionPlanStore, Clock, PatientDirectory, PhaseAccessStore};

/// Query for a patient's adherence report.
#[derive(Debug, Clone)]
pub struct GetAdherenceReportQuery {
    pub patient_id: PatientId,
    /// Defaults to today in the configured timezone.
    pub as_of: Option<NaiveDate>,
}

/// Errors from building an adherence report.
#[derive(Debug, Clone, Error)]
pub enum GetAdherenceReportError {
    #[error("Patient not found: {0}")]
    PatientNotFound(PatientId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Collaborator failure, passed through unmodified.
    #[error(transparent)]
    Store(#[from] DomainError),
}

impl GetAdherenceReportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GetAdherenceReportError::PatientNotFound(_) => ErrorCode::PatientNotFound,
            GetAdherenceReportError::Validation(err) => err.code(),
            GetAdherenceReportError::Store(err) => err.code,
        }
    }
}

impl From<PhaseGateError> for GetAdherenceReportError {
    fn from(err: PhaseGateError) -> Self {
        match err {
            PhaseGateError::PatientNotFound(id) => GetAdherenceReportError::PatientNotFound(id),
            PhaseGateError::Validation(err) => GetAdherenceReportError::Validation(err),
            PhaseGateError::Store(err) => GetAdherenceReportError::Store(err),
        }
    }
}

impl From<GetAdherenceReportError> for DomainError {
    fn from(err: GetAdherenceReportError) -> Self {
        match err {
            GetAdherenceReportError::PatientNotFound(id) => PhaseGateError::PatientNotFound(id).into(),
            GetAdherenceReportError::Validation(err) => err.into(),
            GetAdherenceReportError::Store(err) => err,
        }
    }
}

/// Handler composing phase state with task and plan adherence.
pub struct GetAdherenceReportHandler {
    patients: Arc<dyn PatientDirectory>,
    plans: Arc<dyn ActionPlanStore>,
    phases: Arc<dyn PhaseAccessStore>,
    clock: Arc<dyn Clock>,
    guard: StoreGuard,
}

impl GetAdherenceReportHandler {
    pub fn new(
        patients: Arc<dyn PatientDirectory>,
        plans: Arc<dyn ActionPlanStore>,
        phases: Arc<dyn PhaseAccessStore>,
        clock: Arc<dyn Clock>,
        guard: StoreGuard,
    ) -> Self {
        Self {
            patients,
            plans,
            phases,
            clock,
            guard,
        }
    }

    pub async fn handle(
        &self,
        query: GetAdherenceReportQuery,
    ) -> Result<AdherenceReport, GetAdherenceReportError> {
        let patient_id = query.patient_id;

        self.guard
            .call("find_patient", self.patients.find_patient(&patient_id))
            .await?
            .ok_or(GetAdherenceReportError::PatientNotFound(patient_id))?;

        let as_of = query.as_of.unwrap_or_else(|| self.clock.today());

        let phases = load_patient_phases(self.phases.as_ref(), &self.guard, patient_id).await?;

        let plans = self
            .guard
            .call("list_plans_for_patient", self.plans.list_plans_for_patient(&patient_id))
            .await?;

        let tasks = self
            .guard
            .call("list_tasks_for_patient", self.plans.list_tasks_for_patient(&patient_id))
            .await?;

        let logs = try_join_all(tasks.into_iter().map(|task| async move {
            let completion_dates = self
                .guard
                .call("list_completions", self.plans.list_completions(task.task.id()))
                .await?;
            Ok::<_, DomainError>(TaskCompletionLog {
                task,
                completion_dates,
            })
        }))
        .await?;

        tracing::debug!(
            patient_id = %patient_id,
            as_of = %as_of,
            plans = plans.len(),
            tasks = logs.len(),
            "Assembling adherence report"
        );

        let report = AdherenceReportAssembler::assemble(
            patient_id,
            phases,
            &plans,
            logs,
            as_of,
            self.clock.now(),
        )?;
        Ok(report)
    }
}
