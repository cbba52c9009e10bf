//! HTTP handlers for phase gate endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::{
    PatientPhasesResponse, PhaseAccessResponse, PhaseChangeResponse, TogglePhaseRequest,
};
use crate::adapters::http::error::{parse_path, ApiError};
use crate::adapters::http::extract::ActingTherapist;
use crate::adapters::http::AppState;
use crate::application::{ChangePhaseAccessCommand, ListPhasesQuery, PhaseAction};
use crate::domain::foundation::PatientId;
use crate::domain::phase::ProtocolPhase;

/// GET /api/patients/:patient_id/phases
pub async fn list_phases(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let patient_id: PatientId = parse_path(&patient_id, "patient ID")?;

    let phases = state
        .list_phases_handler()
        .handle(ListPhasesQuery { patient_id })
        .await?;

    Ok((StatusCode::OK, Json(PatientPhasesResponse::from(&phases))))
}

/// POST /api/patients/:patient_id/phases/:phase/toggle
///
/// The body carries the state the therapist saw; a stale view is a 409.
pub async fn toggle_phase(
    state: State<AppState>,
    actor: ActingTherapist,
    path: Path<(String, String)>,
    Json(request): Json<TogglePhaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let action = PhaseAction::Toggle {
        observed_unlocked: request.observed_unlocked,
    };
    change_phase(state, actor, path, action).await
}

/// POST /api/patients/:patient_id/phases/:phase/unlock
pub async fn unlock_phase(
    state: State<AppState>,
    actor: ActingTherapist,
    path: Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    change_phase(state, actor, path, PhaseAction::Unlock).await
}

/// POST /api/patients/:patient_id/phases/:phase/lock
pub async fn lock_phase(
    state: State<AppState>,
    actor: ActingTherapist,
    path: Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    change_phase(state, actor, path, PhaseAction::Lock).await
}

async fn change_phase(
    State(state): State<AppState>,
    actor: ActingTherapist,
    Path((patient_id, phase)): Path<(String, String)>,
    action: PhaseAction,
) -> Result<Json<PhaseChangeResponse>, ApiError> {
    let patient_id: PatientId = parse_path(&patient_id, "patient ID")?;
    // Unknown tokens surface as UNKNOWN_PHASE, not as a 404.
    let phase: ProtocolPhase = phase.parse()?;

    let result = state
        .change_phase_access_handler()
        .handle(
            ChangePhaseAccessCommand {
                patient_id,
                phase,
                action,
            },
            actor.metadata(),
        )
        .await?;

    Ok(Json(PhaseChangeResponse {
        access: PhaseAccessResponse::from(&result.access),
        applied: result.applied,
    }))
}
