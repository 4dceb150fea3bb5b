use serde::Serialize;

use super::track::{PlayedTrack, PublicTrack};

/// The serializable view pushed to every observer on every mutation and
/// delivered to a joining observer immediately.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioState {
    pub is_playing: bool,
    pub current_track: Option<PublicTrack>,
    /// Number of currently connected observers.
    pub listeners: usize,
    pub playlist: Vec<PublicTrack>,
    pub current_index: Option<usize>,
    /// Seconds into the current track. 0 when stopped.
    pub elapsed_time: f64,
    /// Last 10 history entries, oldest first.
    pub history: Vec<PlayedTrack>,
}

/// Condensed view for `GET /status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub is_playing: bool,
    pub current_track: Option<PublicTrack>,
    pub listeners: usize,
    pub playlist_length: usize,
    pub elapsed_time: f64,
}
