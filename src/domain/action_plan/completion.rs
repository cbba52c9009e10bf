//! TaskCompletion records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CompletionId, TaskId, Timestamp, ValidationError};

use super::ActionPlan;

/// One recorded completion of a task on a calendar date.
///
/// Append-only. Several completions may share a date; adherence only asks
/// whether at least one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub id: CompletionId,
    pub task_id: TaskId,
    pub completion_date: NaiveDate,
    pub recorded_at: Timestamp,
}

impl TaskCompletion {
    /// Records a completion against a task of `plan`.
    ///
    /// # Errors
    ///
    /// `CompletionBeforeStart` when the date precedes the plan start.
    pub fn record(
        plan: &ActionPlan,
        task_id: TaskId,
        completion_date: NaiveDate,
        recorded_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        if completion_date < plan.start_date() {
            return Err(ValidationError::CompletionBeforeStart {
                completion_date,
                start_date: plan.start_date(),
            });
        }
        Ok(Self {
            id: CompletionId::new(),
            task_id,
            completion_date,
            recorded_at,
        })
    }
}
