//! Audit event delivery for writes that have already committed.

use crate::domain::foundation::EventEnvelope;
use crate::ports::EventPublisher;

/// Publishes the event for a committed write.
///
/// The state change already happened, so a delivery failure is logged and
/// swallowed. Returning it would report a retryable error for a command whose
/// effect is permanent.
pub(crate) async fn publish_committed(publisher: &dyn EventPublisher, envelope: EventEnvelope) {
    let event_type = envelope.event_type.clone();
    let aggregate_id = envelope.aggregate_id.clone();

    if let Err(err) = publisher.publish(envelope).await {
        tracing::error!(
            event_type = %event_type,
            aggregate_id = %aggregate_id,
            error = %err,
            "Write committed but audit event was not published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryEventBus;
    use crate::domain::foundation::{DomainError, ErrorCode, EventId, Timestamp};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn envelope() -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: "task.added.v1".to_string(),
            schema_version: 1,
            aggregate_id: "plan-1".to_string(),
            aggregate_type: "ActionPlan".to_string(),
            occurred_at: Timestamp::now(),
            payload: serde_json::Value::Null,
            metadata: Default::default(),
        }
    }

    struct RefusingPublisher {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl EventPublisher for RefusingPublisher {
        async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::new(ErrorCode::CollaboratorUnavailable, "bus down"))
        }
    }

    #[tokio::test]
    async fn delivers_to_working_publisher() {
        let bus = InMemoryEventBus::new();
        publish_committed(&bus, envelope()).await;
        assert!(bus.has_event("task.added.v1"));
    }

    #[tokio::test]
    async fn failed_delivery_is_attempted_once_and_swallowed() {
        let publisher = RefusingPublisher {
            attempts: AtomicUsize::new(0),
        };
        publish_committed(&publisher, envelope()).await;
        assert_eq!(publisher.attempts.load(Ordering::SeqCst), 1);
    }
}
