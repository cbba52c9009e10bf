//! Response bodies for phase endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::phase::{PatientPhases, PhaseAccess, ProtocolPhase};

/// Body of a toggle request.
#[derive(Debug, Clone, Deserialize)]
pub struct TogglePhaseRequest {
    pub observed_unlocked: bool,
}

/// One phase as shown to the therapist.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseAccessResponse {
    pub phase: ProtocolPhase,
    pub display_name: String,
    pub order: usize,
    pub is_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<Timestamp>,
}

impl From<&PhaseAccess> for PhaseAccessResponse {
    fn from(access: &PhaseAccess) -> Self {
        Self {
            phase: access.phase(),
            display_name: access.phase().display_name().to_string(),
            order: access.phase().order_index(),
            is_unlocked: access.is_unlocked(),
            unlocked_at: access.unlocked_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientPhasesResponse {
    pub patient_id: String,
    pub unlocked_count: usize,
    pub phases: Vec<PhaseAccessResponse>,
}

impl From<&PatientPhases> for PatientPhasesResponse {
    fn from(phases: &PatientPhases) -> Self {
        Self {
            patient_id: phases.patient_id().to_string(),
            unlocked_count: phases.unlocked_count(),
            phases: phases.iter().map(PhaseAccessResponse::from).collect(),
        }
    }
}

/// Outcome of unlock, lock or toggle.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseChangeResponse {
    #[serde(flatten)]
    pub access: PhaseAccessResponse,
    /// False when the request was an idempotent no-op.
    pub applied: bool,
}
