use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use crate::server::AppState;
use crate::station::CurrentSource;
use crate::storage::FileStore;

use super::{internal, not_found};

/// GET /stream — the current track's audio bytes.
///
/// Local tracks are served from the media store with Range support;
/// online tracks redirect to their source.
pub async fn stream_current(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    info!("GET /stream Range={:?}", headers.get(header::RANGE));
    match state.station.current_source() {
        None => not_found("No track is currently playing", "/stream"),
        Some(CurrentSource::Online(url)) => Redirect::temporary(&url).into_response(),
        Some(CurrentSource::Local(file_name)) => {
            serve_local(&state.files, &file_name, &headers).await
        }
    }
}

async fn serve_local(files: &FileStore, file_name: &str, headers: &HeaderMap) -> Response {
    let path = files.path_of(file_name);
    let mut file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Media file {} unreadable: {}", file_name, e);
            return not_found("Backing media file is missing", "/stream");
        }
    };
    let total = match file.metadata().await {
        Ok(meta) => meta.len(),
        Err(e) => return internal(&format!("Failed to stat media file: {e}"), "/stream"),
    };
    if total == 0 {
        return internal("Media file is empty", "/stream");
    }

    let range = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_range(v, total));
    let (start, end, partial) = match range {
        Some((start, end)) => (start, end, true),
        None => (0, total - 1, false),
    };
    if start >= total {
        return (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{total}"))],
        )
            .into_response();
    }

    if start > 0 {
        if let Err(e) = file.seek(SeekFrom::Start(start)).await {
            return internal(&format!("Failed to seek media file: {e}"), "/stream");
        }
    }
    let length = end - start + 1;
    let stream = ReaderStream::new(file.take(length));

    let mut resp_headers = HeaderMap::new();
    if let Ok(v) = FileStore::content_type(file_name).parse() {
        resp_headers.insert(header::CONTENT_TYPE, v);
    }
    if let Ok(v) = "bytes".parse() {
        resp_headers.insert(header::ACCEPT_RANGES, v);
    }
    if let Ok(v) = length.to_string().parse() {
        resp_headers.insert(header::CONTENT_LENGTH, v);
    }
    let status = if partial {
        if let Ok(v) = format!("bytes {start}-{end}/{total}").parse() {
            resp_headers.insert(header::CONTENT_RANGE, v);
        }
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    (status, resp_headers, Body::from_stream(stream)).into_response()
}

/// `bytes=START-END` with END optional; END is clamped to the file size.
fn parse_range(value: &str, total: u64) -> Option<(u64, u64)> {
    let caps = regex::Regex::new(r"bytes=(\d+)-(\d+)?")
        .unwrap()
        .captures(value)?;
    let start = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let requested_end = caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
    if matches!(requested_end, Some(end) if end < start) {
        return None;
    }
    let end = requested_end
        .unwrap_or(total.saturating_sub(1))
        .min(total.saturating_sub(1));
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_and_closed_ranges() {
        assert_eq!(parse_range("bytes=0-99", 1000), Some((0, 99)));
        assert_eq!(parse_range("bytes=500-", 1000), Some((500, 999)));
        assert_eq!(parse_range("bytes=0-5000", 1000), Some((0, 999)));
    }

    #[test]
    fn start_past_eof_passes_through_for_the_416() {
        assert_eq!(parse_range("bytes=5000-", 1000), Some((5000, 999)));
    }

    #[test]
    fn rejects_nonsense_ranges() {
        assert_eq!(parse_range("bytes=99-10", 1000), None);
        assert_eq!(parse_range("pages=0-1", 1000), None);
    }
}
