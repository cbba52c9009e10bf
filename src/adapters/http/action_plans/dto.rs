//! Request and response bodies for action plan endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::action_plan::{ActionPlan, Task, TaskCompletion};
use crate::domain::foundation::Timestamp;
use crate::domain::schedule::ScheduleWarning;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionPlanRequest {
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionPlanResponse {
    pub id: String,
    pub patient_id: String,
    pub therapist_id: String,
    pub start_date: NaiveDate,
    pub created_at: Timestamp,
}

impl From<&ActionPlan> for ActionPlanResponse {
    fn from(plan: &ActionPlan) -> Self {
        Self {
            id: plan.id().to_string(),
            patient_id: plan.patient_id().to_string(),
            therapist_id: plan.therapist_id().to_string(),
            start_date: plan.start_date(),
            created_at: plan.created_at(),
        }
    }
}

/// Flat task form: `frequency` is `daily`, `weekly` or `custom`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddTaskRequest {
    pub description: String,
    pub frequency: String,
    #[serde(default)]
    pub custom_frequency_details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub action_plan_id: String,
    pub description: String,
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_frequency_details: Option<String>,
    /// Parse warnings for custom schedules; empty otherwise.
    pub warnings: Vec<ScheduleWarning>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            action_plan_id: task.action_plan_id().to_string(),
            description: task.description().to_string(),
            frequency: task.frequency().kind().to_string(),
            custom_frequency_details: task.frequency().custom_details().map(str::to_string),
            warnings: task.frequency().warnings().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordCompletionRequest {
    pub completion_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    pub id: String,
    pub task_id: String,
    pub completion_date: NaiveDate,
    pub recorded_at: Timestamp,
}

impl From<&TaskCompletion> for CompletionResponse {
    fn from(completion: &TaskCompletion) -> Self {
        Self {
            id: completion.id.to_string(),
            task_id: completion.task_id.to_string(),
            completion_date: completion.completion_date,
            recorded_at: completion.recorded_at,
        }
    }
}
