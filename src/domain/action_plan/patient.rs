//! Patient reference as seen by the adherence core.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PatientId, TherapistId};

/// A patient record owned by the patient-management system.
///
/// The core only needs identity and the assigning therapist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub full_name: String,
    pub assigned_therapist: Option<TherapistId>,
}

impl Patient {
    pub fn new(id: PatientId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            assigned_therapist: None,
        }
    }

    pub fn with_therapist(mut self, therapist: TherapistId) -> Self {
        self.assigned_therapist = Some(therapist);
        self
    }
}
