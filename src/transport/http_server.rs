use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::{
    server::AppState,
    transport::routes::{control, ingest, playlist, station, status, stream},
};

/// Uploads carry whole audio files.
const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/playlist", get(status::get_playlist))
        .route("/history", get(status::get_history))
        .route("/upload", post(playlist::upload))
        .route("/upload-multiple", post(playlist::upload_multiple))
        .route(
            "/track/{id}",
            put(playlist::update_track).delete(playlist::delete_track),
        )
        .route("/playlist/reorder", post(playlist::reorder))
        .route("/playlist/shuffle", post(playlist::shuffle))
        .route("/control/play", post(control::play))
        .route("/control/pause", post(control::pause))
        .route("/control/next", post(control::next))
        .route("/control/previous", post(control::previous))
        .route("/control/play/{id}", post(control::play_track))
        .route("/add-url", post(ingest::add_url))
        .route("/add-playlist", post(ingest::add_playlist))
        .route("/import-playlist", post(ingest::import_playlist))
        .route(
            "/station",
            get(station::get_station).put(station::update_station),
        )
        .route("/stream", get(stream::stream_current))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
