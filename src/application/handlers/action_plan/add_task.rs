//! AddTaskHandler - Command handler for adding tasks to a plan.

use std::sync::Arc;

use crate::application::{publish_committed, StoreGuard};
use crate::domain::action_plan::{ActionPlanError, Task, TaskAddedEvent};
use crate::domain::foundation::{ActionPlanId, CommandMetadata, EventId, SerializableDomainEvent};
use crate::domain::schedule::{Frequency, FrequencyKind};
use crate::ports::{ActionPlanStore, Clock, EventPublisher};

/// Command to add a task, in the flat form the UI submits.
#[derive(Debug, Clone)]
pub struct AddTaskCommand {
    pub action_plan_id: ActionPlanId,
    pub description: String,
    pub frequency: FrequencyKind,
    pub custom_frequency_details: Option<String>,
}

/// Handler for adding tasks.
pub struct AddTaskHandler {
    store: Arc<dyn ActionPlanStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    guard: StoreGuard,
}

impl AddTaskHandler {
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
        cmd: AddTaskCommand,
        metadata: CommandMetadata,
    ) -> Result<Task, ActionPlanError> {
        // 1. Validate before touching the store
        let frequency = Frequency::from_parts(cmd.frequency, cmd.custom_frequency_details.as_deref())?;
        let task = Task::new(cmd.action_plan_id, cmd.description, frequency)?;

        // 2. Plan must exist
        self.guard
            .call("find_plan", self.store.find_plan(&cmd.action_plan_id))
            .await?
            .ok_or(ActionPlanError::PlanNotFound(cmd.action_plan_id))?;

        // 3. Persist
        self.guard.call("add_task", self.store.add_task(&task)).await?;

        tracing::info!(
            task_id = %task.id(),
            action_plan_id = %cmd.action_plan_id,
            frequency = %task.frequency().kind(),
            "Task added"
        );

        // 4. Publish
        let event = TaskAddedEvent {
            event_id: EventId::new(),
            action_plan_id: cmd.action_plan_id,
            task_id: *task.id(),
            frequency: task.frequency().kind(),
            added_by: metadata.actor.clone(),
            added_at: self.clock.now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor.to_string());
        publish_committed(self.event_publisher.as_ref(), envelope).await;

        Ok(task)
    }
}
