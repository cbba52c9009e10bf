//! Per-(patient, phase) async locks that linearize gate read-modify-writes.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::PatientId;
use crate::domain::phase::ProtocolPhase;

type PhaseKey = (PatientId, ProtocolPhase);

/// Idle entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed mutex registry. Operations on different keys never wait on each
/// other; operations on the same key run one at a time in arrival order.
#[derive(Default)]
pub struct PhaseKeyLocks {
    locks: Mutex<HashMap<PhaseKey, Arc<Mutex<()>>>>,
}

impl PhaseKeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the key. Released when the guard drops.
    pub async fn acquire(&self, patient_id: PatientId, phase: ProtocolPhase) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry((patient_id, phase))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
