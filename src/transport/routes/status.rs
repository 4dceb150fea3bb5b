use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use crate::server::AppState;
use crate::station::snapshot::StatusView;
use crate::station::track::{PlayedTrack, Track};

/// GET /status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusView> {
    Json(state.station.status())
}

/// GET /playlist
pub async fn get_playlist(State(state): State<Arc<AppState>>) -> Json<Vec<Track>> {
    Json(state.station.playlist_tracks())
}

/// GET /history — last 20 entries, most recent first.
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<PlayedTrack>> {
    Json(state.station.recent_history(20))
}
