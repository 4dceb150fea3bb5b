use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use tracing::{debug, info};

use crate::common::RadioError;
use crate::ingest::{self, playlist_text};
use crate::server::AppState;
use crate::station::track::Track;

use super::{bad_request, radio_error};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUrlRequest {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    /// Seconds; omitted means unknown (no auto-advance).
    #[serde(default)]
    pub duration: Option<u64>,
}

/// POST /add-url
pub async fn add_url(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddUrlRequest>,
) -> Response {
    info!("POST /add-url '{}'", body.url);
    if !ingest::is_valid_url(&body.url) {
        return radio_error(&RadioError::InvalidUrl(body.url), "/add-url");
    }
    let title = body
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| ingest::title_from_url(&body.url));
    let track = Track::online(
        body.url,
        title,
        body.artist.unwrap_or_default(),
        body.duration.unwrap_or(0),
    );
    let public = track.public();
    state.station.add_track(track);
    (StatusCode::OK, Json(serde_json::to_value(public).unwrap_or_default())).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPlaylistRequest {
    pub urls: Vec<String>,
}

/// POST /add-playlist — malformed URLs are skipped, not fatal.
pub async fn add_playlist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddPlaylistRequest>,
) -> Response {
    info!("POST /add-playlist ({} url(s))", body.urls.len());
    let mut tracks = Vec::new();
    let mut skipped = 0usize;
    for url in body.urls {
        if ingest::is_valid_url(&url) {
            let title = ingest::title_from_url(&url);
            tracks.push(Track::online(url, title, String::new(), 0));
        } else {
            debug!("Skipping malformed url '{}'", url);
            skipped += 1;
        }
    }
    let added = tracks.len();
    if added > 0 {
        state.station.add_tracks(tracks);
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "added": added, "skipped": skipped })),
    )
        .into_response()
}

/// POST /import-playlist — M3U/PLS file, multipart.
pub async fn import_playlist(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    info!("POST /import-playlist");
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.file_name().is_none() {
            continue;
        }
        let text = match field.text().await {
            Ok(text) => text,
            Err(e) => {
                return bad_request(&format!("Failed to read playlist file: {e}"), "/import-playlist");
            }
        };
        let tracks = playlist_text::parse(&text);
        let added = tracks.len();
        if added > 0 {
            state.station.add_tracks(tracks);
        }
        return (
            StatusCode::OK,
            Json(serde_json::json!({ "added": added })),
        )
            .into_response();
    }
    bad_request("No playlist file provided", "/import-playlist")
}
