//! CreateActionPlanHandler - Command handler for creating action plans.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::application::{publish_committed, StoreGuard};
use crate::domain::action_plan::{ActionPlan, ActionPlanCreatedEvent, ActionPlanError};
use crate::domain::foundation::{CommandMetadata, EventId, PatientId, SerializableDomainEvent};
use crate::ports::{ActionPlanStore, Clock, EventPublisher, PatientDirectory};

/// Command to create a plan for a patient.
#[derive(Debug, Clone)]
pub struct CreateActionPlanCommand {
    pub patient_id: PatientId,
    pub start_date: NaiveDate,
}

/// Handler for creating action plans. The acting therapist becomes the
/// plan's author.
pub struct CreateActionPlanHandler {
    patients: Arc<dyn PatientDirectory>,
    store: Arc<dyn ActionPlanStore>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    guard: StoreGuard,
}

impl CreateActionPlanHandler {
    pub fn new(
        patients: Arc<dyn PatientDirectory>,
        store: Arc<dyn ActionPlanStore>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        guard: StoreGuard,
    ) -> Self {
        Self {
            patients,
            store,
            event_publisher,
            clock,
            guard,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateActionPlanCommand,
        metadata: CommandMetadata,
    ) -> Result<ActionPlan, ActionPlanError> {
        self.guard
            .call("find_patient", self.patients.find_patient(&cmd.patient_id))
            .await?
            .ok_or(ActionPlanError::PatientNotFound(cmd.patient_id))?;

        let plan = ActionPlan::new(
            cmd.patient_id,
            metadata.actor.clone(),
            cmd.start_date,
            self.clock.now(),
        );

        self.guard
            .call("create_plan", self.store.create_plan(&plan))
            .await?;

        tracing::info!(
            action_plan_id = %plan.id(),
            patient_id = %cmd.patient_id,
            start_date = %cmd.start_date,
            "Action plan created"
        );

        let event = ActionPlanCreatedEvent {
            event_id: EventId::new(),
            action_plan_id: *plan.id(),
            patient_id: cmd.patient_id,
            therapist_id: metadata.actor.clone(),
            start_date: cmd.start_date,
            created_at: plan.created_at(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor.to_string());
        publish_committed(self.event_publisher.as_ref(), envelope).await;

        Ok(plan)
    }
}
