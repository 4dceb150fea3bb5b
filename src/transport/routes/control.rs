use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};
use tracing::info;
use uuid::Uuid;

use crate::server::AppState;

use super::{bad_request, radio_error};

/// POST /control/play
pub async fn play(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("POST /control/play");
    match state.station.play() {
        Ok(()) => Json(state.station.status()).into_response(),
        Err(e) => radio_error(&e, "/control/play"),
    }
}

/// POST /control/pause
pub async fn pause(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("POST /control/pause");
    state.station.pause();
    Json(state.station.status())
}

/// POST /control/next
pub async fn next(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("POST /control/next");
    state.station.next();
    Json(state.station.status())
}

/// POST /control/previous
pub async fn previous(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("POST /control/previous");
    state.station.previous();
    Json(state.station.status())
}

/// POST /control/play/{id}
pub async fn play_track(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    info!("POST /control/play/{}", id);
    let path = format!("/control/play/{id}");
    let id = match id.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => return bad_request("Malformed track id", &path),
    };
    match state.station.play_track(id) {
        Ok(()) => Json(state.station.status()).into_response(),
        Err(e) => radio_error(&e, &path),
    }
}
