use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Full-rewrite JSON persistence for the playlist and station documents.
///
/// Writes are fired off the mutation path and failures are swallowed after
/// logging: the in-memory state stays authoritative for the running
/// process.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

pub const PLAYLIST_DOC: &str = "playlist.json";
pub const STATION_DOC: &str = "station.json";

impl DocumentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Load a document at startup; a missing or unreadable file yields the
    /// default.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.data_dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Failed to parse {}: {}", name, e);
                    T::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
            Err(e) => {
                warn!("Failed to read {}: {}", name, e);
                T::default()
            }
        }
    }

    /// Rewrite a document in full, fire-and-forget.
    pub fn save<T: Serialize>(&self, name: &'static str, value: &T) {
        let json = match serde_json::to_vec_pretty(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize {}: {}", name, e);
                return;
            }
        };
        let path = self.data_dir.join(name);
        tokio::spawn(async move {
            match tokio::fs::write(&path, json).await {
                Ok(()) => debug!("Persisted {}", name),
                Err(e) => warn!("Failed to persist {}: {}", name, e),
            }
        });
    }

    /// Synchronous rewrite, used by tests and shutdown.
    pub fn save_blocking<T: Serialize>(&self, name: &str, value: &T) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(self.data_dir.join(name), json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::profile::StationProfile;

    #[test]
    fn missing_document_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path()).unwrap();
        let profile: StationProfile = docs.load_or_default(STATION_DOC);
        assert_eq!(profile.name, StationProfile::default().name);
    }

    #[test]
    fn roundtrips_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path()).unwrap();

        let mut profile = StationProfile::default();
        profile.name = "Night Owl FM".to_string();
        docs.save_blocking(STATION_DOC, &profile).unwrap();

        let loaded: StationProfile = docs.load_or_default(STATION_DOC);
        assert_eq!(loaded.name, "Night Owl FM");
    }

    #[test]
    fn corrupt_document_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join(STATION_DOC), b"{not json").unwrap();
        let profile: StationProfile = docs.load_or_default(STATION_DOC);
        assert_eq!(profile.name, StationProfile::default().name);
    }
}
