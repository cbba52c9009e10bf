//! Action plan error types.

use crate::domain::foundation::{
    ActionPlanId, DomainError, ErrorCode, PatientId, TaskId, ValidationError,
};

/// Errors from action plan commands.
#[derive(Debug, Clone)]
pub enum ActionPlanError {
    /// Patient is unknown to the patient directory.
    PatientNotFound(PatientId),
    /// Plan was not found.
    PlanNotFound(ActionPlanId),
    /// Task was not found.
    TaskNotFound(TaskId),
    /// Input was rejected before anything was written.
    Validation(ValidationError),
    /// A collaborator failed; passed through unmodified.
    Collaborator(DomainError),
}

impl ActionPlanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ActionPlanError::PatientNotFound(_) => ErrorCode::PatientNotFound,
            ActionPlanError::PlanNotFound(_) => ErrorCode::ActionPlanNotFound,
            ActionPlanError::TaskNotFound(_) => ErrorCode::TaskNotFound,
            ActionPlanError::Validation(err) => err.code(),
            ActionPlanError::Collaborator(err) => err.code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ActionPlanError::PatientNotFound(id) => format!("Patient not found: {}", id),
            ActionPlanError::PlanNotFound(id) => format!("Action plan not found: {}", id),
            ActionPlanError::TaskNotFound(id) => format!("Task not found: {}", id),
            ActionPlanError::Validation(err) => err.to_string(),
            ActionPlanError::Collaborator(err) => err.message.clone(),
        }
    }
}

impl std::fmt::Display for ActionPlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ActionPlanError {}

impl From<DomainError> for ActionPlanError {
    fn from(err: DomainError) -> Self {
        ActionPlanError::Collaborator(err)
    }
}

impl From<ValidationError> for ActionPlanError {
    fn from(err: ValidationError) -> Self {
        ActionPlanError::Validation(err)
    }
}

impl From<ActionPlanError> for DomainError {
    fn from(err: ActionPlanError) -> Self {
        match err {
            ActionPlanError::Collaborator(err) => err,
            ActionPlanError::Validation(err) => err.into(),
            ActionPlanError::PatientNotFound(id) => {
                DomainError::new(ErrorCode::PatientNotFound, format!("Patient not found: {}", id))
                    .with_detail("patient_id", id.to_string())
            }
            ActionPlanError::PlanNotFound(id) => DomainError::new(
                ErrorCode::ActionPlanNotFound,
                format!("Action plan not found: {}", id),
            )
            .with_detail("action_plan_id", id.to_string()),
            ActionPlanError::TaskNotFound(id) => {
                DomainError::new(ErrorCode::TaskNotFound, format!("Task not found: {}", id))
                    .with_detail("task_id", id.to_string())
            }
        }
    }
}
