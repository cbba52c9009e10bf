//! ListPhasesHandler - Query handler for a patient's phase states.

use std::sync::Arc;

use crate::application::StoreGuard;
use crate::domain::foundation::PatientId;
use crate::domain::phase::{PatientPhases, PhaseAccess, PhaseGateError};
use crate::ports::{PatientDirectory, PhaseAccessStore};

/// Query for all five phase states of a patient.
#[derive(Debug, Clone)]
pub struct ListPhasesQuery {
    pub patient_id: PatientId,
}

/// Handler for listing phase states, default-filled and in canonical order.
pub struct ListPhasesHandler {
    patients: Arc<dyn PatientDirectory>,
    store: Arc<dyn PhaseAccessStore>,
    guard: StoreGuard,
}

impl ListPhasesHandler {
    pub fn new(
        patients: Arc<dyn PatientDirectory>,
        store: Arc<dyn PhaseAccessStore>,
        guard: StoreGuard,
    ) -> Self {
        Self {
            patients,
            store,
            guard,
        }
    }

    pub async fn handle(&self, query: ListPhasesQuery) -> Result<PatientPhases, PhaseGateError> {
        self.guard
            .call("find_patient", self.patients.find_patient(&query.patient_id))
            .await?
            .ok_or(PhaseGateError::PatientNotFound(query.patient_id))?;

        load_patient_phases(self.store.as_ref(), &self.guard, query.patient_id).await
    }
}

/// Reads the sparse records and fills in the missing phases as locked.
///
/// A malformed record is logged and shown as locked; one bad row must not
/// hide the other phases from the dashboard.
pub(crate) async fn load_patient_phases(
    store: &dyn PhaseAccessStore,
    guard: &StoreGuard,
    patient_id: PatientId,
) -> Result<PatientPhases, PhaseGateError> {
    let records = guard
        .call("read_phase_access", store.read_phase_access(&patient_id))
        .await?;

    let stored: Vec<PhaseAccess> = records
        .into_iter()
        .filter_map(|record| match PhaseAccess::from_record(record) {
            Ok(access) => Some(access),
            Err(err) => {
                tracing::warn!(
                    patient_id = %patient_id,
                    phase = %record.phase,
                    error = %err,
                    "Skipping malformed phase access record"
                );
                None
            }
        })
        .collect();

    tracing::debug!(patient_id = %patient_id, stored = stored.len(), "Loaded phase access");
    Ok(PatientPhases::from_sparse(patient_id, stored))
}
