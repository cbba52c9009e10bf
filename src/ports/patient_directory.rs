//! Patient directory port - lookups into the patient-management system.

use async_trait::async_trait;

use crate::domain::action_plan::Patient;
use crate::domain::foundation::{DomainError, PatientId};

/// Read-only access to patient records.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Find a patient by id. Returns `None` if unknown.
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, DomainError>;
}
