//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{validation, AppState, NewTimer, TimerUpdate};
use super::responses::{
    ApiResponse, CreateTimerRequest, HealthResponse, StatusResponse, TimerListResponse,
    UpdateTimerRequest,
};

/// Snapshot the collection for a response envelope, mapping lock failures
/// to a 500.
fn snapshot(state: &AppState) -> Result<Vec<crate::state::Timer>, StatusCode> {
    state.timers().map_err(|e| {
        error!("Failed to read timer collection: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /timers - Return the ordered timer collection
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerListResponse>, StatusCode> {
    let timers = snapshot(&state)?;
    Ok(Json(TimerListResponse { timers }))
}

/// Handle POST /timers - Validate input and add a new timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    if !validation::is_valid_timer_input(
        &request.title,
        request.hours,
        request.minutes,
        request.seconds,
    ) {
        warn!("Rejected invalid timer input: title={:?}", request.title);
        let timers = snapshot(&state)?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(
                "Timer needs a title of 1-50 characters and a duration above zero".to_string(),
                timers,
            )),
        ));
    }

    let input = NewTimer {
        title: request.title.trim().to_string(),
        description: request.description,
        duration: validation::total_seconds(request.hours, request.minutes, request.seconds),
    };

    match state.add_timer(input) {
        Ok(timer) => {
            info!("Create endpoint added timer '{}'", timer.title);
            let timers = snapshot(&state)?;
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    format!("Timer '{}' added", timer.title),
                    timers,
                )),
            ))
        }
        Err(e) => {
            error!("Failed to add timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /timers/:id - Apply a partial edit to a timer
pub async fn edit_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let title_ok = request.title.as_deref().map_or(true, validation::is_valid_title);
    let duration_ok = request.duration.map_or(true, validation::is_valid_duration);

    if !title_ok || !duration_ok {
        warn!("Rejected invalid edit for timer {}", id);
        let timers = snapshot(&state)?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(
                "Edited title must be 1-50 characters and duration above zero".to_string(),
                timers,
            )),
        ));
    }

    let update = TimerUpdate {
        title: request.title.map(|t| t.trim().to_string()),
        description: request.description,
        duration: request.duration,
    };

    match state.edit_timer(&id, update) {
        Ok(Some(timer)) => {
            let timers = snapshot(&state)?;
            Ok((
                StatusCode::OK,
                Json(ApiResponse::ok(format!("Timer '{}' updated", timer.title), timers)),
            ))
        }
        Ok(None) => unknown_timer(&state, &id).map(|r| (StatusCode::OK, r)),
        Err(e) => {
            error!("Failed to edit timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.delete_timer(&id) {
        Ok(Some(timer)) => {
            let timers = snapshot(&state)?;
            Ok(Json(ApiResponse::ok(
                format!("Timer '{}' deleted", timer.title),
                timers,
            )))
        }
        Ok(None) => unknown_timer(&state, &id),
        Err(e) => {
            error!("Failed to delete timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:id/toggle - Start or pause a timer
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle_timer(&id) {
        Ok(Some(timer)) => {
            let message = if timer.is_running {
                format!("Timer '{}' started", timer.title)
            } else {
                format!("Timer '{}' paused", timer.title)
            };
            let timers = snapshot(&state)?;
            Ok(Json(ApiResponse::ok(message, timers)))
        }
        Ok(None) => unknown_timer(&state, &id),
        Err(e) => {
            error!("Failed to toggle timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers/:id/restart - Reset a timer to its full duration
pub async fn restart_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.restart_timer(&id) {
        Ok(Some(timer)) => {
            let timers = snapshot(&state)?;
            Ok(Json(ApiResponse::ok(
                format!("Timer '{}' reset to {}s", timer.title, timer.duration),
                timers,
            )))
        }
        Ok(None) => unknown_timer(&state, &id),
        Err(e) => {
            error!("Failed to restart timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current server and collection status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timers = snapshot(&state)?;
    let running = timers.iter().filter(|t| t.is_running).count();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        total_timers: timers.len(),
        running_timers: running,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        data_file: state.storage().path().display().to_string(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Response for mutations aimed at an id that is not in the collection.
///
/// These are harmless no-ops, not failures: the client may race a delete
/// with another action, and the last observed write wins.
fn unknown_timer(state: &AppState, id: &str) -> Result<Json<ApiResponse>, StatusCode> {
    let timers = snapshot(state)?;
    Ok(Json(ApiResponse::error(
        format!("No timer with id {}", id),
        timers,
    )))
}
