//! In-memory action plan store.
//!
//! Used by tests and by the server when no database is configured.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::action_plan::{ActionPlan, AssignedTask, Task, TaskCompletion};
use crate::domain::foundation::{ActionPlanId, DomainError, ErrorCode, PatientId, TaskId};
use crate::ports::ActionPlanStore;

#[derive(Debug, Default)]
struct State {
    plans: HashMap<ActionPlanId, ActionPlan>,
    /// Insertion order is the listing order.
    tasks: Vec<Task>,
    completions: Vec<TaskCompletion>,
}

/// In-memory storage for plans, tasks and completions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActionPlanStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryActionPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored completion records (useful for tests).
    pub async fn completion_count(&self) -> usize {
        self.state.read().await.completions.len()
    }
}

#[async_trait]
impl ActionPlanStore for InMemoryActionPlanStore {
    async fn create_plan(&self, plan: &ActionPlan) -> Result<(), DomainError> {
        self.state.write().await.plans.insert(*plan.id(), plan.clone());
        Ok(())
    }

    async fn find_plan(&self, id: &ActionPlanId) -> Result<Option<ActionPlan>, DomainError> {
        Ok(self.state.read().await.plans.get(id).cloned())
    }

    async fn list_plans_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<ActionPlan>, DomainError> {
        let state = self.state.read().await;
        let mut plans: Vec<ActionPlan> = state
            .plans
            .values()
            .filter(|p| p.patient_id() == patient_id)
            .cloned()
            .collect();
        plans.sort_by_key(|p| (p.start_date(), p.created_at()));
        Ok(plans)
    }

    async fn add_task(&self, task: &Task) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.plans.contains_key(task.action_plan_id()) {
            return Err(DomainError::new(
                ErrorCode::ActionPlanNotFound,
                format!("Action plan not found: {}", task.action_plan_id()),
            ));
        }
        state.tasks.push(task.clone());
        Ok(())
    }

    async fn find_task(&self, id: &TaskId) -> Result<Option<AssignedTask>, DomainError> {
        let state = self.state.read().await;
        let assigned = state.tasks.iter().find(|t| t.id() == id).and_then(|task| {
            state.plans.get(task.action_plan_id()).map(|plan| AssignedTask {
                plan: plan.clone(),
                task: task.clone(),
            })
        });
        Ok(assigned)
    }

    async fn list_tasks_for_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<AssignedTask>, DomainError> {
        let state = self.state.read().await;
        let assigned = state
            .tasks
            .iter()
            .filter_map(|task| {
                state
                    .plans
                    .get(task.action_plan_id())
                    .filter(|plan| plan.patient_id() == patient_id)
                    .map(|plan| AssignedTask {
                        plan: plan.clone(),
                        task: task.clone(),
                    })
            })
            .collect();
        Ok(assigned)
    }

    async fn list_completions(&self, task_id: &TaskId) -> Result<Vec<NaiveDate>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .completions
            .iter()
            .filter(|c| &c.task_id == task_id)
            .map(|c| c.completion_date)
            .collect())
    }

    async fn record_completion(&self, completion: &TaskCompletion) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.tasks.iter().any(|t| t.id() == &completion.task_id) {
            return Err(DomainError::new(
                ErrorCode::TaskNotFound,
                format!("Task not found: {}", completion.task_id),
            ));
        }
        state.completions.push(completion.clone());
        Ok(())
    }
}
