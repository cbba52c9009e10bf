//! ChangePhaseAccessHandler - unlock, lock or toggle one protocol phase.
//!
//! The read-modify-write runs under the per-key lock and ends in a
//! compare-and-swap write, so concurrent commands on the same key linearize
//! even across processes sharing one store. A toggle carries the state the
//! caller saw; if the stored state no longer matches, the toggle is a
//! conflict whether the rival ran in this process or another one.

use std::sync::Arc;

use crate::application::{publish_committed, PhaseKeyLocks, StoreGuard};
use crate::domain::foundation::{
    CommandMetadata, DomainError, EventEnvelope, EventId, PatientId, SerializableDomainEvent,
    Timestamp,
};
use crate::domain::phase::{
    PhaseAccess, PhaseGateError, PhaseLockedEvent, PhaseTransition, PhaseUnlockedEvent,
    ProtocolPhase,
};
use crate::ports::{Clock, EventPublisher, PatientDirectory, PhaseAccessStore};

/// Requested gate operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    Unlock,
    Lock,
    /// Flip the state the caller observed.
    Toggle { observed_unlocked: bool },
}

/// Command to change access to one phase for one patient.
#[derive(Debug, Clone)]
pub struct ChangePhaseAccessCommand {
    pub patient_id: PatientId,
    pub phase: ProtocolPhase,
    pub action: PhaseAction,
}

/// Result of a gate operation.
#[derive(Debug, Clone)]
pub struct ChangePhaseAccessResult {
    /// State after the operation.
    pub access: PhaseAccess,
    /// False when the operation was an idempotent no-op.
    pub applied: bool,
}

/// Handler for phase gate commands.
pub struct ChangePhaseAccessHandler {
    patients: Arc<dyn PatientDirectory>,
    store: Arc<dyn PhaseAccessStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    locks: Arc<PhaseKeyLocks>,
    guard: StoreGuard,
}

impl ChangePhaseAccessHandler {
    pub fn new(
        patients: Arc<dyn PatientDirectory>,
        store: Arc<dyn PhaseAccessStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        locks: Arc<PhaseKeyLocks>,
        guard: StoreGuard,
    ) -> Self {
        Self {
            patients,
            store,
            event_publisher,
            clock,
            locks,
            guard,
        }
    }

    pub async fn handle(
        &self,
        cmd: ChangePhaseAccessCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangePhaseAccessResult, PhaseGateError> {
        // 1. Patient must exist
        self.guard
            .call("find_patient", self.patients.find_patient(&cmd.patient_id))
            .await?
            .ok_or(PhaseGateError::PatientNotFound(cmd.patient_id))?;

        // 2. Serialize operations on this key
        let _key_guard = self.locks.acquire(cmd.patient_id, cmd.phase).await;

        // 3. Read current state (absent = locked)
        let current = self.read_current(&cmd.patient_id, cmd.phase).await?;

        // 4. Apply transition
        let now = self.clock.now();
        let transition = match cmd.action {
            PhaseAction::Unlock => current.unlock(now)?,
            PhaseAction::Lock => current.lock()?,
            PhaseAction::Toggle { observed_unlocked } => {
                if current.is_unlocked() != observed_unlocked {
                    tracing::warn!(
                        patient_id = %cmd.patient_id,
                        phase = %cmd.phase,
                        observed_unlocked,
                        "Toggle based on a stale phase state"
                    );
                    return Err(stale_toggle(&cmd).into());
                }
                current.toggle(now)?
            }
        };

        if !transition.is_applied() {
            tracing::debug!(
                patient_id = %cmd.patient_id,
                phase = %cmd.phase,
                action = ?cmd.action,
                "Phase access unchanged"
            );
            return Ok(ChangePhaseAccessResult {
                access: transition.after,
                applied: false,
            });
        }

        // 5. Conditional write against the state we read
        let write = self.store.write_phase_access(
            &transition.after,
            transition.before.is_unlocked(),
        );
        if let Err(err) = self.guard.call("write_phase_access", write).await {
            tracing::warn!(
                patient_id = %cmd.patient_id,
                phase = %cmd.phase,
                error = %err,
                "Phase access write failed"
            );
            return Err(err.into());
        }

        tracing::info!(
            patient_id = %cmd.patient_id,
            phase = %cmd.phase,
            unlocked = transition.after.is_unlocked(),
            actor = %metadata.actor,
            "Phase access changed"
        );

        // 6. Publish audit event (failures are logged, the write stands)
        let envelope = Self::event_for(&transition, &metadata, now)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor.to_string());
        publish_committed(self.event_publisher.as_ref(), envelope).await;

        Ok(ChangePhaseAccessResult {
            access: transition.after,
            applied: true,
        })
    }

    async fn read_current(
        &self,
        patient_id: &PatientId,
        phase: ProtocolPhase,
    ) -> Result<PhaseAccess, PhaseGateError> {
        let records = self
            .guard
            .call("read_phase_access", self.store.read_phase_access(patient_id))
            .await?;

        match records.into_iter().find(|r| r.phase == phase) {
            Some(record) => Ok(PhaseAccess::from_record(record)?),
            None => Ok(PhaseAccess::locked(*patient_id, phase)),
        }
    }

    fn event_for(
        transition: &PhaseTransition,
        metadata: &CommandMetadata,
        now: Timestamp,
    ) -> EventEnvelope {
        let after = &transition.after;
        match after.unlocked_at() {
            Some(unlocked_at) => PhaseUnlockedEvent {
                event_id: EventId::new(),
                patient_id: *after.patient_id(),
                phase: after.phase(),
                unlocked_by: metadata.actor.clone(),
                unlocked_at,
            }
            .to_envelope(),
            None => PhaseLockedEvent {
                event_id: EventId::new(),
                patient_id: *after.patient_id(),
                phase: after.phase(),
                locked_by: metadata.actor.clone(),
                locked_at: now,
            }
            .to_envelope(),
        }
    }
}

fn stale_toggle(cmd: &ChangePhaseAccessCommand) -> DomainError {
    DomainError::conflict(format!(
        "Phase '{}' for patient {} changed since it was read",
        cmd.phase, cmd.patient_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        FixedClock, InMemoryEventBus, InMemoryPatientDirectory, InMemoryPhaseAccessStore,
    };
    use crate::domain::foundation::ErrorCode;
    use crate::domain::phase::PhaseAccessRecord;
    use async_trait::async_trait;
    use std::time::Duration;

    // ─────────────────────────────────────────────────────────────────────
    // Test fixtures
    // ─────────────────────────────────────────────────────────────────────

    struct Fixture {
        handler: ChangePhaseAccessHandler,
        store: InMemoryPhaseAccessStore,
        bus: Arc<InMemoryEventBus>,
        clock: FixedClock,
        patient_id: PatientId,
    }

    async fn fixture() -> Fixture {
        fixture_with_store(InMemoryPhaseAccessStore::new()).await
    }

    async fn fixture_with_store(store: InMemoryPhaseAccessStore) -> Fixture {
        let directory = InMemoryPatientDirectory::new();
        let patient_id = directory.register("Ana Souza").await;
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = FixedClock::new(Timestamp::from_datetime(
            chrono::DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
        ));

        let handler = ChangePhaseAccessHandler::new(
            Arc::new(directory),
            Arc::new(store.clone()),
            bus.clone(),
            Arc::new(clock.clone()),
            Arc::new(PhaseKeyLocks::new()),
            StoreGuard::from_millis(200),
        );

        Fixture {
            handler,
            store,
            bus,
            clock,
            patient_id,
        }
    }

    fn command(patient_id: PatientId, action: PhaseAction) -> ChangePhaseAccessCommand {
        ChangePhaseAccessCommand {
            patient_id,
            phase: ProtocolPhase::Somatic,
            action,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unlock_sets_timestamp_from_clock() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(command(f.patient_id, PhaseAction::Unlock), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert!(result.applied);
        assert_eq!(result.access.unlocked_at(), Some(f.clock.now()));
        assert_eq!(f.store.write_count(), 1);
    }

    #[tokio::test]
    async fn second_unlock_is_noop_with_same_timestamp() {
        let f = fixture().await;
        let metadata = CommandMetadata::test_fixture();

        let first = f
            .handler
            .handle(command(f.patient_id, PhaseAction::Unlock), metadata.clone())
            .await
            .unwrap();
        f.clock.advance_secs(3_600);
        let second = f
            .handler
            .handle(command(f.patient_id, PhaseAction::Unlock), metadata)
            .await
            .unwrap();

        assert!(!second.applied);
        assert_eq!(second.access.unlocked_at(), first.access.unlocked_at());
        assert_eq!(f.store.write_count(), 1);
        assert_eq!(f.bus.event_count(), 1);
    }

    #[tokio::test]
    async fn lock_on_missing_record_is_noop() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(command(f.patient_id, PhaseAction::Lock), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert!(!result.applied);
        assert!(!result.access.is_unlocked());
        assert_eq!(f.bus.event_count(), 0);
    }

    fn toggle(observed_unlocked: bool) -> PhaseAction {
        PhaseAction::Toggle { observed_unlocked }
    }

    #[tokio::test]
    async fn toggle_flips_twice_back_to_locked() {
        let f = fixture().await;
        let metadata = CommandMetadata::test_fixture();

        let first = f
            .handler
            .handle(command(f.patient_id, toggle(false)), metadata.clone())
            .await
            .unwrap();
        let second = f
            .handler
            .handle(command(f.patient_id, toggle(true)), metadata)
            .await
            .unwrap();

        assert!(first.access.is_unlocked());
        assert!(!second.access.is_unlocked());
        assert_eq!(second.access.unlocked_at(), None);
    }

    #[tokio::test]
    async fn stale_toggle_is_conflict_without_write() {
        let f = fixture().await;
        let metadata = CommandMetadata::test_fixture();
        f.handler
            .handle(command(f.patient_id, toggle(false)), metadata.clone())
            .await
            .unwrap();

        // Still believes the phase is locked.
        let err = f
            .handler
            .handle(command(f.patient_id, toggle(false)), metadata)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(f.store.write_count(), 1);
        assert_eq!(f.bus.event_count(), 1);
        let stored = f.store.read_phase_access(&f.patient_id).await.unwrap();
        assert!(stored[0].is_unlocked);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn publishes_events_with_actor_and_correlation() {
        let f = fixture().await;
        let metadata = CommandMetadata::test_fixture();

        f.handler
            .handle(command(f.patient_id, toggle(false)), metadata.clone())
            .await
            .unwrap();
        f.handler
            .handle(command(f.patient_id, toggle(true)), metadata)
            .await
            .unwrap();

        let unlocked = f.bus.events_of_type("phase.unlocked.v1");
        let locked = f.bus.events_of_type("phase.locked.v1");
        assert_eq!(unlocked.len(), 1);
        assert_eq!(locked.len(), 1);
        assert_eq!(unlocked[0].metadata.actor_id, Some("therapist-test".to_string()));
        assert_eq!(
            unlocked[0].metadata.correlation_id,
            Some("test-correlation-id".to_string())
        );
        assert_eq!(unlocked[0].payload["unlocked_by"], "therapist-test");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Failures
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_patient_is_not_found() {
        let f = fixture().await;

        let err = f
            .handler
            .handle(command(PatientId::new(), PhaseAction::Unlock), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(matches!(err, PhaseGateError::PatientNotFound(_)));
        assert_eq!(f.store.write_count(), 0);
    }

    #[tokio::test]
    async fn malformed_stored_record_is_rejected() {
        let f = fixture().await;
        f.store
            .seed(PhaseAccessRecord {
                patient_id: f.patient_id,
                phase: ProtocolPhase::Somatic,
                is_unlocked: true,
                unlocked_at: None,
            })
            .await;

        let err = f
            .handler
            .handle(command(f.patient_id, toggle(true)), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn slow_store_times_out_without_state_change() {
        let f = fixture_with_store(
            InMemoryPhaseAccessStore::new().with_latency(Duration::from_millis(500)),
        )
        .await;

        let err = f
            .handler
            .handle(command(f.patient_id, PhaseAction::Unlock), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::CollaboratorTimeout);
        assert_eq!(f.store.write_count(), 0);
        assert_eq!(f.bus.event_count(), 0);
    }

    /// Store whose state is changed by someone else between read and write.
    struct RacingStore {
        inner: InMemoryPhaseAccessStore,
    }

    #[async_trait]
    impl PhaseAccessStore for RacingStore {
        async fn read_phase_access(
            &self,
            patient_id: &PatientId,
        ) -> Result<Vec<PhaseAccessRecord>, DomainError> {
            let records = self.inner.read_phase_access(patient_id).await?;
            // Another process unlocks the phase right after our read.
            let rival = PhaseAccess::unlocked(*patient_id, ProtocolPhase::Somatic, Timestamp::now());
            self.inner.write_phase_access(&rival, false).await?;
            Ok(records)
        }

        async fn write_phase_access(
            &self,
            access: &PhaseAccess,
            expected_unlocked: bool,
        ) -> Result<(), DomainError> {
            self.inner.write_phase_access(access, expected_unlocked).await
        }
    }

    #[tokio::test]
    async fn lost_update_surfaces_as_conflict() {
        let directory = InMemoryPatientDirectory::new();
        let patient_id = directory.register("Ana Souza").await;
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = ChangePhaseAccessHandler::new(
            Arc::new(directory),
            Arc::new(RacingStore {
                inner: InMemoryPhaseAccessStore::new(),
            }),
            bus.clone(),
            Arc::new(FixedClock::new(Timestamp::now())),
            Arc::new(PhaseKeyLocks::new()),
            StoreGuard::default(),
        );

        let err = handler
            .handle(command(patient_id, toggle(false)), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(bus.event_count(), 0);
    }

    struct UnreachableBus;

    #[async_trait]
    impl EventPublisher for UnreachableBus {
        async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::CollaboratorTimeout, "bus down"))
        }
    }

    #[tokio::test]
    async fn publish_failure_keeps_committed_change() {
        let directory = InMemoryPatientDirectory::new();
        let patient_id = directory.register("Ana Souza").await;
        let store = InMemoryPhaseAccessStore::new();
        let handler = ChangePhaseAccessHandler::new(
            Arc::new(directory),
            Arc::new(store.clone()),
            Arc::new(UnreachableBus),
            Arc::new(FixedClock::new(Timestamp::now())),
            Arc::new(PhaseKeyLocks::new()),
            StoreGuard::default(),
        );

        let result = handler
            .handle(command(patient_id, toggle(false)), CommandMetadata::test_fixture())
            .await
            .unwrap();
        assert!(result.applied);
        assert!(result.access.is_unlocked());

        // A client retrying with the same observation cannot flip it back.
        let retry = handler
            .handle(command(patient_id, toggle(false)), CommandMetadata::test_fixture())
            .await;
        assert!(matches!(retry, Err(ref e) if e.is_conflict()));
        assert_eq!(store.write_count(), 1);
        assert!(store.read_phase_access(&patient_id).await.unwrap()[0].is_unlocked);
    }
}
