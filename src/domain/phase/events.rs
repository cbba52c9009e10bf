//! Audit events emitted when a phase gate actually changes state.

use serde::{Deserialize, Serialize};

use super::ProtocolPhase;
use crate::domain::foundation::{domain_event, EventId, PatientId, TherapistId, Timestamp};

/// A phase was unlocked for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseUnlockedEvent {
    pub event_id: EventId,
    pub patient_id: PatientId,
    pub phase: ProtocolPhase,
    pub unlocked_by: TherapistId,
    pub unlocked_at: Timestamp,
}

domain_event!(
    PhaseUnlockedEvent,
    event_type = "phase.unlocked.v1",
    aggregate_id = patient_id,
    aggregate_type = "PatientPhaseAccess",
    occurred_at = unlocked_at,
    event_id = event_id
);

/// A phase was locked again for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseLockedEvent {
    pub event_id: EventId,
    pub patient_id: PatientId,
    pub phase: ProtocolPhase,
    pub locked_by: TherapistId,
    pub locked_at: Timestamp,
}

domain_event!(
    PhaseLockedEvent,
    event_type = "phase.locked.v1",
    aggregate_id = patient_id,
    aggregate_type = "PatientPhaseAccess",
    occurred_at = locked_at,
    event_id = event_id
);
