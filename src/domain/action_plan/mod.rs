//! Action plan aggregate: plans, their tasks and completion records.

mod completion;
mod errors;
mod events;
mod patient;
mod plan;
mod task;

pub use completion::TaskCompletion;
pub use errors::ActionPlanError;
pub use events::{ActionPlanCreatedEvent, TaskAddedEvent, TaskCompletionRecordedEvent};
pub use patient::Patient;
pub use plan::ActionPlan;
pub use task::{AssignedTask, Task};
