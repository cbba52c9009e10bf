//! Per-(patient, phase) access state and its total default-filled view.

use serde::{Deserialize, Serialize};

use super::ProtocolPhase;
use crate::domain::foundation::{PatientId, StateMachine, Timestamp, ValidationError};

/// The two gate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    Locked,
    Unlocked,
}

impl StateMachine for PhaseState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self != target
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            PhaseState::Locked => vec![PhaseState::Unlocked],
            PhaseState::Unlocked => vec![PhaseState::Locked],
        }
    }
}

/// Gate state with the unlock instant carried only by `Unlocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseStatus {
    Locked,
    Unlocked { at: Timestamp },
}

/// Access record for one patient and phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseAccess {
    patient_id: PatientId,
    phase: ProtocolPhase,
    status: PhaseStatus,
}

/// Flat persisted form, as read from and written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAccessRecord {
    pub patient_id: PatientId,
    pub phase: ProtocolPhase,
    pub is_unlocked: bool,
    pub unlocked_at: Option<Timestamp>,
}

impl PhaseAccess {
    /// The default state of any phase without a stored record.
    pub fn locked(patient_id: PatientId, phase: ProtocolPhase) -> Self {
        Self {
            patient_id,
            phase,
            status: PhaseStatus::Locked,
        }
    }

    pub fn unlocked(patient_id: PatientId, phase: ProtocolPhase, at: Timestamp) -> Self {
        Self {
            patient_id,
            phase,
            status: PhaseStatus::Unlocked { at },
        }
    }

    /// Validates a stored record.
    ///
    /// A locked record carrying a stale timestamp is normalized; an unlocked
    /// record without one is rejected.
    pub fn from_record(record: PhaseAccessRecord) -> Result<Self, ValidationError> {
        match (record.is_unlocked, record.unlocked_at) {
            (true, Some(at)) => Ok(Self::unlocked(record.patient_id, record.phase, at)),
            (true, None) => Err(ValidationError::invalid_format(
                "unlocked_at",
                format!("phase '{}' is unlocked without a timestamp", record.phase),
            )),
            (false, _) => Ok(Self::locked(record.patient_id, record.phase)),
        }
    }

    pub fn to_record(&self) -> PhaseAccessRecord {
        PhaseAccessRecord {
            patient_id: self.patient_id,
            phase: self.phase,
            is_unlocked: self.is_unlocked(),
            unlocked_at: self.unlocked_at(),
        }
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn phase(&self) -> ProtocolPhase {
        self.phase
    }

    pub fn status(&self) -> PhaseStatus {
        self.status
    }

    pub fn state(&self) -> PhaseState {
        match self.status {
            PhaseStatus::Locked => PhaseState::Locked,
            PhaseStatus::Unlocked { .. } => PhaseState::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == PhaseState::Unlocked
    }

    pub fn unlocked_at(&self) -> Option<Timestamp> {
        match self.status {
            PhaseStatus::Unlocked { at } => Some(at),
            PhaseStatus::Locked => None,
        }
    }

    /// Locked → Unlocked at `now`; no-op when already unlocked.
    pub fn unlock(&self, now: Timestamp) -> Result<PhaseTransition, ValidationError> {
        if self.is_unlocked() {
            return Ok(PhaseTransition::unchanged(*self));
        }
        self.state().transition_to(PhaseState::Unlocked)?;
        Ok(PhaseTransition {
            before: *self,
            after: Self::unlocked(self.patient_id, self.phase, now),
        })
    }

    /// Unlocked → Locked; no-op when already locked.
    pub fn lock(&self) -> Result<PhaseTransition, ValidationError> {
        if !self.is_unlocked() {
            return Ok(PhaseTransition::unchanged(*self));
        }
        self.state().transition_to(PhaseState::Locked)?;
        Ok(PhaseTransition {
            before: *self,
            after: Self::locked(self.patient_id, self.phase),
        })
    }

    /// Flips the state observed at call time.
    pub fn toggle(&self, now: Timestamp) -> Result<PhaseTransition, ValidationError> {
        if self.is_unlocked() {
            self.lock()
        } else {
            self.unlock(now)
        }
    }
}

/// Before/after pair produced by a gate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub before: PhaseAccess,
    pub after: PhaseAccess,
}

impl PhaseTransition {
    fn unchanged(access: PhaseAccess) -> Self {
        Self {
            before: access,
            after: access,
        }
    }

    /// True when the state actually changed.
    pub fn is_applied(&self) -> bool {
        self.before.state() != self.after.state()
    }
}

/// Total view of one patient's phases: one entry per phase, canonical order.
///
/// Phases without a stored record are filled in as locked, so callers never
/// see "unknown" as distinct from "locked".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientPhases {
    patient_id: PatientId,
    entries: Vec<PhaseAccess>,
}

impl PatientPhases {
    /// Builds the total view from a sparse set of stored entries.
    ///
    /// Entries for other patients are ignored; the last entry wins on
    /// duplicates.
    pub fn from_sparse(patient_id: PatientId, stored: impl IntoIterator<Item = PhaseAccess>) -> Self {
        let mut entries: Vec<PhaseAccess> = ProtocolPhase::ALL
            .iter()
            .map(|phase| PhaseAccess::locked(patient_id, *phase))
            .collect();

        for access in stored {
            if access.patient_id == patient_id {
                entries[access.phase.order_index()] = access;
            }
        }

        Self { patient_id, entries }
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn get(&self, phase: ProtocolPhase) -> &PhaseAccess {
        &self.entries[phase.order_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseAccess> {
        self.entries.iter()
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.is_unlocked()).count()
    }

    pub fn into_vec(self) -> Vec<PhaseAccess> {
        self.entries
    }
}
