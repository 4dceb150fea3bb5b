use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ingest;
use crate::server::AppState;
use crate::station::track::{Track, TrackPatch};

use super::{bad_request, internal, radio_error};

/// Store one uploaded file and probe it into a track record.
async fn ingest_upload(state: &AppState, original_name: &str, bytes: &[u8]) -> Result<Track, String> {
    let file_name = state
        .files
        .save(original_name, bytes)
        .await
        .map_err(|e| format!("Failed to store upload: {e}"))?;
    let path = state.files.path_of(&file_name);
    match ingest::probe(path.to_string_lossy().into_owned()).await {
        Ok(meta) => Ok(Track::local(file_name, meta)),
        Err(e) => {
            // The blob is useless without readable audio in it.
            state.files.delete_best_effort(&file_name);
            Err(format!("Failed to extract metadata: {e}"))
        }
    }
}

/// POST /upload
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    info!("POST /upload");
    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return bad_request(&format!("Failed to read upload: {e}"), "/upload"),
        };
        return match ingest_upload(&state, &original_name, &bytes).await {
            Ok(track) => {
                let public = track.public();
                state.station.add_track(track);
                (StatusCode::OK, Json(serde_json::to_value(public).unwrap_or_default()))
                    .into_response()
            }
            Err(msg) => internal(&msg, "/upload"),
        };
    }
    bad_request("No file provided", "/upload")
}

/// POST /upload-multiple
///
/// Individually broken files are skipped with a logged warning; the batch
/// lands as one playlist mutation and one broadcast.
pub async fn upload_multiple(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    info!("POST /upload-multiple");
    let mut tracks = Vec::new();
    let mut failures = Vec::new();
    let mut saw_file = false;

    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_file = true;
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping unreadable upload '{}': {}", original_name, e);
                failures.push(original_name);
                continue;
            }
        };
        match ingest_upload(&state, &original_name, &bytes).await {
            Ok(track) => tracks.push(track),
            Err(msg) => {
                warn!("Skipping upload '{}': {}", original_name, msg);
                failures.push(original_name);
            }
        }
    }

    if !saw_file {
        return bad_request("No files provided", "/upload-multiple");
    }
    if tracks.is_empty() {
        return internal(
            &format!("All {} file(s) failed to ingest", failures.len()),
            "/upload-multiple",
        );
    }

    let added: Vec<_> = tracks.iter().map(Track::public).collect();
    state.station.add_tracks(tracks);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "added": added, "failed": failures })),
    )
        .into_response()
}

/// PUT /track/{id}
pub async fn update_track(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<TrackPatch>,
) -> Response {
    info!("PUT /track/{}", id);
    let path = format!("/track/{id}");
    let id = match id.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => return bad_request("Malformed track id", &path),
    };
    match state.station.update_track(id, &patch) {
        Ok(track) => {
            (StatusCode::OK, Json(serde_json::to_value(track).unwrap_or_default())).into_response()
        }
        Err(e) => radio_error(&e, &path),
    }
}

/// DELETE /track/{id} — removes the entry and, for local tracks, the
/// backing file (best effort).
pub async fn delete_track(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    info!("DELETE /track/{}", id);
    let path = format!("/track/{id}");
    let id = match id.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => return bad_request("Malformed track id", &path),
    };
    match state.station.remove_track(id) {
        Ok(removed) => {
            if let Some(file_name) = &removed.file_name {
                state.files.delete_best_effort(file_name);
            }
            (
                StatusCode::OK,
                Json(serde_json::json!({ "removed": removed.id })),
            )
                .into_response()
        }
        Err(e) => radio_error(&e, &path),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_index: usize,
    pub to_index: usize,
}

/// POST /playlist/reorder
pub async fn reorder(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReorderRequest>,
) -> Response {
    info!("POST /playlist/reorder {} -> {}", body.from_index, body.to_index);
    match state.station.reorder(body.from_index, body.to_index) {
        Ok(()) => Json(state.station.status()).into_response(),
        Err(e) => radio_error(&e, "/playlist/reorder"),
    }
}

/// POST /playlist/shuffle
pub async fn shuffle(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("POST /playlist/shuffle");
    state.station.shuffle();
    Json(state.station.status())
}
