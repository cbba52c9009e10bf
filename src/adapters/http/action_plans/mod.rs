//! HTTP adapter for action plan endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ActionPlanResponse, AddTaskRequest, CompletionResponse, CreateActionPlanRequest,
    RecordCompletionRequest, TaskResponse,
};
pub use routes::action_plan_routes;
