//! Phase access store port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PatientId};
use crate::domain::phase::{PhaseAccess, PhaseAccessRecord};

/// Persistence port for per-(patient, phase) access records.
///
/// Records are sparse: a missing record means locked. Records are never
/// deleted, only overwritten.
#[async_trait]
pub trait PhaseAccessStore: Send + Sync {
    /// Stored records for the patient, in no particular order.
    async fn read_phase_access(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<PhaseAccessRecord>, DomainError>;

    /// Atomic conditional upsert for one (patient, phase) key.
    ///
    /// Writes `access` only if the stored `is_unlocked` (absent = false)
    /// still equals `expected_unlocked`.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the stored state changed since it was read
    /// - `DatabaseError` on persistence failure
    async fn write_phase_access(
        &self,
        access: &PhaseAccess,
        expected_unlocked: bool,
    ) -> Result<(), DomainError>;
}
