//! In-memory patient directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::action_plan::Patient;
use crate::domain::foundation::{DomainError, PatientId};
use crate::ports::PatientDirectory;

/// Patient lookups backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPatientDirectory {
    patients: Arc<RwLock<HashMap<PatientId, Patient>>>,
}

impl InMemoryPatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, patient: Patient) {
        self.patients.write().await.insert(patient.id, patient);
    }

    /// Registers a patient with a generated id and returns it.
    pub async fn register(&self, full_name: impl Into<String>) -> PatientId {
        let id = PatientId::new();
        self.insert(Patient::new(id, full_name)).await;
        id
    }
}

#[async_trait]
impl PatientDirectory for InMemoryPatientDirectory {
    async fn find_patient(&self, id: &PatientId) -> Result<Option<Patient>, DomainError> {
        Ok(self.patients.read().await.get(id).cloned())
    }
}
