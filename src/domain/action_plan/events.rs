//! Events emitted by action plan commands.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, ActionPlanId, CompletionId, EventId, PatientId, TaskId, TherapistId, Timestamp,
};
use crate::domain::schedule::FrequencyKind;

/// A therapist created an action plan for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlanCreatedEvent {
    pub event_id: EventId,
    pub action_plan_id: ActionPlanId,
    pub patient_id: PatientId,
    pub therapist_id: TherapistId,
    pub start_date: NaiveDate,
    pub created_at: Timestamp,
}

domain_event!(
    ActionPlanCreatedEvent,
    event_type = "action_plan.created.v1",
    aggregate_id = action_plan_id,
    aggregate_type = "ActionPlan",
    occurred_at = created_at,
    event_id = event_id
);

/// A task was added to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAddedEvent {
    pub event_id: EventId,
    pub action_plan_id: ActionPlanId,
    pub task_id: TaskId,
    pub frequency: FrequencyKind,
    pub added_by: TherapistId,
    pub added_at: Timestamp,
}

domain_event!(
    TaskAddedEvent,
    event_type = "action_plan.task_added.v1",
    aggregate_id = action_plan_id,
    aggregate_type = "ActionPlan",
    occurred_at = added_at,
    event_id = event_id
);

/// A completion was appended to a task's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletionRecordedEvent {
    pub event_id: EventId,
    pub action_plan_id: ActionPlanId,
    pub task_id: TaskId,
    pub completion_id: CompletionId,
    pub completion_date: NaiveDate,
    pub recorded_at: Timestamp,
}

domain_event!(
    TaskCompletionRecordedEvent,
    event_type = "action_plan.completion_recorded.v1",
    aggregate_id = action_plan_id,
    aggregate_type = "ActionPlan",
    occurred_at = recorded_at,
    event_id = event_id
);
