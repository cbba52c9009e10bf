//! HTTP handlers for action plan endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{
    ActionPlanResponse, AddTaskRequest, CompletionResponse, CreateActionPlanRequest,
    RecordCompletionRequest, TaskResponse,
};
use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::extract::ActingTherapist;
use crate::adapters::http::AppState;
use crate::application::{AddTaskCommand, CreateActionPlanCommand, RecordCompletionCommand};
use crate::domain::foundation::{ActionPlanId, PatientId, TaskId};
use crate::domain::schedule::FrequencyKind;

/// POST /api/patients/:patient_id/action-plans
pub async fn create_action_plan(
    State(state): State<AppState>,
    actor: ActingTherapist,
    Path(patient_id): Path<String>,
    Json(request): Json<CreateActionPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patient_id: PatientId = parse_path(&patient_id, "patient ID")?;

    let plan = state
        .create_action_plan_handler()
        .handle(
            CreateActionPlanCommand {
                patient_id,
                start_date: request.start_date,
            },
            actor.metadata(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ActionPlanResponse::from(&plan))))
}

/// POST /api/action-plans/:action_plan_id/tasks
pub async fn add_task(
    State(state): State<AppState>,
    actor: ActingTherapist,
    Path(action_plan_id): Path<String>,
    Json(request): Json<AddTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let action_plan_id: ActionPlanId = parse_path(&action_plan_id, "action plan ID")?;
    let frequency: FrequencyKind = request.frequency.parse()?;

    let task = state
        .add_task_handler()
        .handle(
            AddTaskCommand {
                action_plan_id,
                description: request.description,
                frequency,
                custom_frequency_details: request.custom_frequency_details,
            },
            actor.metadata(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// POST /api/tasks/:task_id/completions
pub async fn record_completion(
    State(state): State<AppState>,
    actor: ActingTherapist,
    Path(task_id): Path<String>,
    Json(request): Json<RecordCompletionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let task_id: TaskId = parse_path(&task_id, "task ID")?;

    let completion = state
        .record_completion_handler()
        .handle(
            RecordCompletionCommand {
                task_id,
                completion_date: request.completion_date,
            },
            actor.metadata(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CompletionResponse::from(&completion))))
}
