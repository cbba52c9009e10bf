//! Action plan store port.
//!
//! Plans, tasks and completions live in an external system; the core only
//! reads them and appends completions.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::action_plan::{ActionPlan, AssignedTask, Task, TaskCompletion};
use crate::domain::foundation::{ActionPlanId, DomainError, PatientId, TaskId};

/// Persistence port for the action plan aggregate.
///
/// Every call may fail with `DatabaseError`; callers wrap calls in a
/// timeout and never retry on their own.
#[async_trait]
pub trait ActionPlanStore: Send + Sync {
    /// Persist a new plan.
    async fn create_plan(&self, plan: &ActionPlan) -> Result<(), DomainError>;

    /// Find a plan by id. Returns `None` if not found.
    async fn find_plan(&self, id: &ActionPlanId) -> Result<Option<ActionPlan>, DomainError>;

    /// All plans of a patient, ordered by start date.
    async fn list_plans_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<ActionPlan>, DomainError>;

    /// Persist a new task under an existing plan.
    ///
    /// # Errors
    ///
    /// - `ActionPlanNotFound` if the plan doesn't exist
    async fn add_task(&self, task: &Task) -> Result<(), DomainError>;

    /// Find a task together with its plan.
    async fn find_task(&self, id: &TaskId) -> Result<Option<AssignedTask>, DomainError>;

    /// Every task of every plan belonging to the patient.
    async fn list_tasks_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssignedTask>, DomainError>;

    /// Completion dates of a task; duplicates allowed, any order.
    async fn list_completions(&self, task_id: &TaskId) -> Result<Vec<NaiveDate>, DomainError>;

    /// Append a completion record.
    ///
    /// # Errors
    ///
    /// - `TaskNotFound` if the task doesn't exist
    async fn record_completion(&self, completion: &TaskCompletion) -> Result<(), DomainError>;
}
