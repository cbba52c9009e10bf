//! Action plan command handlers.

mod add_task;
mod create_action_plan;
mod record_completion;

pub use add_task::{AddTaskCommand, AddTaskHandler};
pub use create_action_plan::{CreateActionPlanCommand, CreateActionPlanHandler};
pub use record_completion::{RecordCompletionCommand, RecordCompletionHandler};
