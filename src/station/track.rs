use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::now_ms;
use crate::ingest::TrackMeta;

/// A playlist entry: a locally stored file or an external URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: Option<i32>,
    /// Seconds. 0 means unknown; auto-advance is disabled for such tracks.
    #[serde(default)]
    pub duration: u64,
    /// Stored media file name. `None` for online tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// External source URL. `None` for local tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub added_at: u64,
}

impl Track {
    /// A track backed by a file in the media store.
    pub fn local(file_name: String, meta: TrackMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: meta.title,
            artist: meta.artist,
            album: meta.album,
            genre: meta.genre,
            year: meta.year,
            duration: meta.duration,
            file_name: Some(file_name),
            url: None,
            is_online: false,
            cover: None,
            added_at: now_ms(),
        }
    }

    /// A track backed by an external URL.
    pub fn online(url: String, title: String, artist: String, duration: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            artist,
            album: String::new(),
            genre: String::new(),
            year: None,
            duration,
            file_name: None,
            url: Some(url),
            is_online: true,
            cover: None,
            added_at: now_ms(),
        }
    }

    /// Display-safe reduction: everything a client may see. The stored
    /// file name stays internal.
    pub fn public(&self) -> PublicTrack {
        PublicTrack {
            id: self.id,
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            genre: self.genre.clone(),
            year: self.year,
            duration: self.duration,
            is_online: self.is_online,
            url: if self.is_online { self.url.clone() } else { None },
            cover: self.cover.clone(),
        }
    }

    pub fn apply_patch(&mut self, patch: &TrackPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(artist) = &patch.artist {
            self.artist = artist.clone();
        }
        if let Some(album) = &patch.album {
            self.album = album.clone();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.clone();
        }
        if let Some(year) = patch.year {
            self.year = Some(year);
        }
        if let Some(cover) = &patch.cover {
            self.cover = Some(cover.clone());
        }
    }
}

/// What observers see in snapshots and playlist summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTrack {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: Option<i32>,
    pub duration: u64,
    pub is_online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// Partial update of display metadata. Omitted fields are left unchanged;
/// an empty string is a valid new value, not "unset".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub cover: Option<String>,
}

/// A history entry: a past-played track with its start timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedTrack {
    #[serde(flatten)]
    pub track: PublicTrack,
    /// Unix timestamp in milliseconds.
    pub played_at: u64,
}
