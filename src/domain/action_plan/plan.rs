//! ActionPlan entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActionPlanId, PatientId, TherapistId, Timestamp};

/// A dated set of self-therapy tasks prescribed to one patient.
///
/// Plans are immutable once created; tasks and completions hang off them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    id: ActionPlanId,
    patient_id: PatientId,
    therapist_id: TherapistId,
    start_date: NaiveDate,
    created_at: Timestamp,
}

impl ActionPlan {
    /// Creates a new plan authored by `therapist_id`.
    pub fn new(
        patient_id: PatientId,
        therapist_id: TherapistId,
        start_date: NaiveDate,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ActionPlanId::new(),
            patient_id,
            therapist_id,
            start_date,
            created_at,
        }
    }

    /// Rebuilds a plan from storage without generating a new id.
    pub fn reconstitute(
        id: ActionPlanId,
        patient_id: PatientId,
        therapist_id: TherapistId,
        start_date: NaiveDate,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            patient_id,
            therapist_id,
            start_date,
            created_at,
        }
    }

    pub fn id(&self) -> &ActionPlanId {
        &self.id
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn therapist_id(&self) -> &TherapistId {
        &self.therapist_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// True once `as_of` has reached the start date.
    pub fn has_started(&self, as_of: NaiveDate) -> bool {
        self.start_date <= as_of
    }
}
