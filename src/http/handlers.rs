use super::state::AppState;
use crate::assistant::{AssistantEvent, AssistantSettings};
use crate::run::{ActivityRow, RunCommand, RunSnapshot, RunSummary};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StartRunResponse {
    pub run_id: String,
    pub status: RunSnapshot,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitiesResponse {
    pub count: usize,
    pub total_distance_meters: f64,
    pub activities: Vec<ActivityRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn run_not_found(run_id: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("Run {} not found", run_id))
}

// ============================================================================
// Assistant settings
// ============================================================================

/// GET /assistant/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<AssistantSettings> {
    Json(state.settings.read().await.clone())
}

/// PUT /assistant/settings
/// Replace the settings used by the next run
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<AssistantSettings>,
) -> Response {
    if let Err(e) = settings.validate() {
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    info!(
        "Assistant settings updated (enabled={}, every {})",
        settings.enabled,
        settings.trigger_label()
    );
    *state.settings.write().await = settings.clone();

    (StatusCode::OK, Json(settings)).into_response()
}

/// PATCH /assistant/settings
/// Change only the fields present in the body
pub async fn patch_settings(
    State(state): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Response {
    let mut settings = state.settings.write().await;
    match settings.merged(&patch) {
        Ok(updated) => {
            info!(
                "Assistant settings patched (enabled={}, every {})",
                updated.enabled,
                updated.trigger_label()
            );
            *settings = updated.clone();
            (StatusCode::OK, Json(updated)).into_response()
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, format!("{:#}", e)),
    }
}

/// POST /assistant/settings/interval/increment
pub async fn increment_interval(State(state): State<AppState>) -> Json<AssistantSettings> {
    let mut settings = state.settings.write().await;
    settings.increment_interval();
    Json(settings.clone())
}

/// POST /assistant/settings/interval/decrement
/// Saturates at 1
pub async fn decrement_interval(State(state): State<AppState>) -> Json<AssistantSettings> {
    let mut settings = state.settings.write().await;
    settings.decrement_interval();
    Json(settings.clone())
}

// ============================================================================
// Runs
// ============================================================================

/// POST /runs/start
/// Create a run and begin its countdown
pub async fn start_run(State(state): State<AppState>) -> Response {
    match state.start_run().await {
        Ok(session) => {
            let run_id = session.run_id().to_string();
            info!("Run started: {}", run_id);
            (
                StatusCode::OK,
                Json(StartRunResponse {
                    run_id: run_id.clone(),
                    status: session.snapshot().await,
                    message: format!("Run {} counting down", run_id),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to start run: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to start run: {}", e),
            )
        }
    }
}

async fn apply_command(state: &AppState, run_id: &str, command: RunCommand) -> Response {
    let Some(session) = state.get_run(run_id).await else {
        return run_not_found(run_id);
    };

    let result = match command {
        RunCommand::Pause => session.pause().await,
        RunCommand::Resume => session.resume().await,
        RunCommand::HoldStart => session.hold_start().await,
        RunCommand::HoldRelease => session.hold_release().await,
        RunCommand::Cancel => session.cancel().await,
        other => Err(anyhow::anyhow!("{:?} is driven by timers", other)),
    };

    match result {
        Ok(()) => (StatusCode::OK, Json(session.snapshot().await)).into_response(),
        Err(e) => {
            warn!("Run {} rejected {:?}: {}", run_id, command, e);
            error_response(StatusCode::CONFLICT, e.to_string())
        }
    }
}

/// POST /runs/:run_id/pause
pub async fn pause_run(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    apply_command(&state, &run_id, RunCommand::Pause).await
}

/// POST /runs/:run_id/resume
pub async fn resume_run(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    apply_command(&state, &run_id, RunCommand::Resume).await
}

/// POST /runs/:run_id/finish/hold
/// Press the finish button; the run completes once the hold lasts long enough
pub async fn hold_finish(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    apply_command(&state, &run_id, RunCommand::HoldStart).await
}

/// POST /runs/:run_id/finish/release
pub async fn release_finish(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    apply_command(&state, &run_id, RunCommand::HoldRelease).await
}

/// POST /runs/:run_id/cancel
pub async fn cancel_run(State(state): State<AppState>, Path(run_id): Path<String>) -> Response {
    apply_command(&state, &run_id, RunCommand::Cancel).await
}

/// GET /runs/:run_id/status
pub async fn get_run_status(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    match state.get_run(&run_id).await {
        Some(session) => (StatusCode::OK, Json(session.snapshot().await)).into_response(),
        None => run_not_found(&run_id),
    }
}

/// GET /runs/:run_id/events
/// Assistant announcements fired so far
pub async fn get_run_events(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    match state.get_run(&run_id).await {
        Some(session) => {
            let events: Vec<AssistantEvent> = session.events().await;
            (StatusCode::OK, Json(events)).into_response()
        }
        None => run_not_found(&run_id),
    }
}

// ============================================================================
// Activities
// ============================================================================

/// GET /activities
pub async fn list_activities(State(state): State<AppState>) -> Json<ActivitiesResponse> {
    let activities = state.activities.read().await;
    Json(ActivitiesResponse {
        count: activities.len(),
        total_distance_meters: activities.total_distance_meters(),
        activities: activities.rows(),
    })
}

/// GET /activities/:run_id
/// Full record including samples and announcements
pub async fn get_activity(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Response {
    let activities = state.activities.read().await;
    match activities.get(&run_id) {
        Some(run) => {
            let run: RunSummary = run.clone();
            (StatusCode::OK, Json(run)).into_response()
        }
        None => run_not_found(&run_id),
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
