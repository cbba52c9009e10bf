//! Task entity.

use crate::domain::foundation::{ActionPlanId, TaskId, ValidationError};
use crate::domain::schedule::Frequency;

use super::ActionPlan;

/// A recurring activity inside an action plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    action_plan_id: ActionPlanId,
    description: String,
    frequency: Frequency,
}

impl Task {
    /// Creates a task, rejecting blank descriptions.
    pub fn new(
        action_plan_id: ActionPlanId,
        description: impl Into<String>,
        frequency: Frequency,
    ) -> Result<Self, ValidationError> {
        Self::reconstitute(TaskId::new(), action_plan_id, description, frequency)
    }

    /// Rebuilds a task from storage. Descriptions are still validated.
    pub fn reconstitute(
        id: TaskId,
        action_plan_id: ActionPlanId,
        description: impl Into<String>,
        frequency: Frequency,
    ) -> Result<Self, ValidationError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        Ok(Self {
            id,
            action_plan_id,
            description,
            frequency,
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn action_plan_id(&self) -> &ActionPlanId {
        &self.action_plan_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }
}

/// A task together with the plan it belongs to.
///
/// Adherence needs the plan's start date, so stores hand tasks out in
/// this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedTask {
    pub plan: ActionPlan,
    pub task: Task,
}
