//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use super::responses::{ApiResponse, HealthResponse, IntervalRequest, StatusResponse};
use crate::{
    bridge::{TrayAction, TrayItem, TrayMenu, UserAction},
    error::ReminderError,
    state::AppState,
};

pub type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

fn rejection(err: ReminderError) -> (StatusCode, Json<ApiResponse>) {
    match err {
        ReminderError::Validation(e) => {
            info!("Rejected user input: {}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::rejected(e.to_string())))
        }
        other => {
            error!("Action failed: {}", other);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error(other.to_string())),
            )
        }
    }
}

fn run_action(state: &AppState, action: UserAction, message: &str) -> ApiResult {
    let view = state.user_action(action).map_err(rejection)?;
    Ok(Json(ApiResponse::accepted(message.to_string(), view)))
}

/// Handle POST /interval - Validate and apply a new reminder interval
pub async fn set_interval_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IntervalRequest>,
) -> ApiResult {
    let input = request.value.into_text();
    run_action(&state, UserAction::SetInterval(input), "Reminder interval updated")
}

/// Handle POST /notify - Show a reminder now
pub async fn notify_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::ShowReminderNow, "Reminder requested")
}

/// Handle POST /pause - Pause reminders
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::Pause, "Reminders paused")
}

/// Handle POST /resume - Resume reminders
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::Resume, "Reminders resumed")
}

/// Handle POST /updates/check
pub async fn check_updates_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::CheckForUpdates, "Update check requested")
}

/// Handle POST /updates/download
pub async fn download_update_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::DownloadUpdate, "Update download requested")
}

/// Handle POST /updates/install
pub async fn install_update_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run_action(&state, UserAction::RestartToUpdate, "Restarting to install update")
}

/// Handle GET /status - Return reminder, update and display state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        reminder: state.reminder_snapshot(),
        update: state.update_state(),
        view: state.view(),
        tray: state.tray_menu(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream events to an attached UI
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match SseEvent::default().event(event.name()).json_data(&event) {
                    Ok(sse) => return Some((Ok(sse), rx)),
                    Err(e) => warn!("Failed to encode event {}: {}", event.name(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /tray - Current tray menu
pub async fn tray_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrayMenu>, StatusCode> {
    state.tray_menu().map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Handle POST /tray/:item - Activate a tray menu item
pub async fn tray_item_handler(
    State(state): State<Arc<AppState>>,
    Path(item): Path<String>,
) -> ApiResult {
    let Some(item) = TrayItem::parse(&item) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::rejected(format!("Unknown tray item: {}", item))),
        ));
    };

    match state.activate_tray(item) {
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::rejected("Tray is not available".to_string())),
        )),
        Some(Err(e)) => Err(rejection(e)),
        Some(Ok(action)) => {
            let message = match action {
                TrayAction::Send(command) => format!("Sent {}", command.name()),
                TrayAction::ShowMainWindow => "Showing main window".to_string(),
                TrayAction::Quit => "Quitting".to_string(),
            };
            Ok(Json(ApiResponse::accepted(message, state.view())))
        }
    }
}

/// Handle POST /window/all-closed - Apply the last-window-closed policy
pub async fn windows_closed_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let message = if state.lifecycle.on_all_windows_closed() {
        "Quitting"
    } else {
        "Staying resident"
    };
    Json(ApiResponse::accepted(message.to_string(), state.view()))
}

/// Handle POST /quit - Explicit quit
pub async fn quit_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.lifecycle.request_quit();
    Json(ApiResponse::accepted("Quitting".to_string(), state.view()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
