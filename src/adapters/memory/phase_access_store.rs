//! In-memory phase access store with compare-and-swap writes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, PatientId};
use crate::domain::phase::{PhaseAccess, PhaseAccessRecord, ProtocolPhase};
use crate::ports::PhaseAccessStore;

/// In-memory storage for sparse phase access records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhaseAccessStore {
    records: Arc<RwLock<HashMap<(PatientId, ProtocolPhase), PhaseAccessRecord>>>,
    writes: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl InMemoryPhaseAccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artificial delay to every call (for timeout and race tests).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seeds a raw record, bypassing the compare-and-swap.
    pub async fn seed(&self, record: PhaseAccessRecord) {
        self.records
            .write()
            .await
            .insert((record.patient_id, record.phase), record);
    }

    /// Number of successful writes (useful for tests).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl PhaseAccessStore for InMemoryPhaseAccessStore {
    async fn read_phase_access(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<PhaseAccessRecord>, DomainError> {
        self.simulate_latency().await;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| &r.patient_id == patient_id)
            .copied()
            .collect())
    }

    async fn write_phase_access(
        &self,
        access: &PhaseAccess,
        expected_unlocked: bool,
    ) -> Result<(), DomainError> {
        self.simulate_latency().await;
        let key = (*access.patient_id(), access.phase());

        let mut records = self.records.write().await;
        let current = records.get(&key).map(|r| r.is_unlocked).unwrap_or(false);
        if current != expected_unlocked {
            return Err(DomainError::conflict(format!(
                "Phase '{}' for patient {} changed concurrently",
                access.phase(),
                access.patient_id()
            )));
        }

        records.insert(key, access.to_record());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
