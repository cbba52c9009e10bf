//! RecordCompletionHandler - Command handler appending to a task's log.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::{publish_committed, StoreGuard};
use crate::domain::action_plan::{ActionPlanError, TaskCompletion, TaskCompletionRecordedEvent};
use crate::domain::foundation::{CommandMetadata, EventId, SerializableDomainEvent, TaskId};
use crate::ports::{ActionPlanStore, Clock, EventPublisher};

/// Command to record that a task was done on a date.
#[derive(Debug, Clone)]
pub struct RecordCompletionCommand {
    pub task_id: TaskId,
    pub completion_date: NaiveDate,
}

/// Handler for recording completions.
pub struct RecordCompletionHandler {
    store: Arc<dyn ActionPlanStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    guard: StoreGuard,
}

impl RecordCompletionHandler {
    pub fn new(
        store: Arc<dyn ActionPlanStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        guard: StoreGuard,
    ) -> Self {
        Self {
            store,
            event_publisher,
            clock,
            guard,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordCompletionCommand,
        metadata: CommandMetadata,
    ) -> Result<TaskCompletion, ActionPlanError> {
        let assigned = self
            .guard
            .call("find_task", self.store.find_task(&cmd.task_id))
            .await?
            .ok_or(ActionPlanError::TaskNotFound(cmd.task_id))?;

        let completion =
            TaskCompletion::record(&assigned.plan, cmd.task_id, cmd.completion_date, self.clock.now())?;

        self.guard
            .call("record_completion", self.store.record_completion(&completion))
            .await?;

        tracing::info!(
            task_id = %cmd.task_id,
            completion_date = %cmd.completion_date,
            "Task completion recorded"
        );

        let event = TaskCompletionRecordedEvent {
            event_id: EventId::new(),
            action_plan_id: *assigned.plan.id(),
            task_id: cmd.task_id,
            completion_id: completion.id,
            completion_date: completion.completion_date,
            recorded_at: completion.recorded_at,
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor.to_string());
        publish_committed(self.event_publisher.as_ref(), envelope).await;

        Ok(completion)
    }
}
