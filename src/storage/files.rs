use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

/// On-disk store for uploaded audio. Files are renamed to a fresh uuid,
/// keeping the original extension for probing and content-type guessing.
#[derive(Debug, Clone)]
pub struct FileStore {
    media_dir: PathBuf,
}

impl FileStore {
    pub fn new(media_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let media_dir = media_dir.into();
        std::fs::create_dir_all(&media_dir)?;
        Ok(Self { media_dir })
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.media_dir.join(file_name)
    }

    /// Write uploaded bytes under a fresh name. Returns the stored file name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        let file_name = match ext {
            Some(ext) if !ext.is_empty() => format!("{}.{}", Uuid::new_v4(), ext),
            _ => Uuid::new_v4().to_string(),
        };
        let path = self.media_dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        info!("Stored upload '{}' as {}", original_name, file_name);
        Ok(file_name)
    }

    /// Best-effort removal of a backing file; failure is logged, never fatal.
    pub fn delete_best_effort(&self, file_name: &str) {
        let path = self.media_dir.join(file_name);
        let name = file_name.to_string();
        tokio::spawn(async move {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to delete media file {}: {}", name, e);
            }
        });
    }

    /// Content type from the stored extension.
    pub fn content_type(file_name: &str) -> &'static str {
        match Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("mp3") => "audio/mpeg",
            Some("ogg") | Some("oga") => "audio/ogg",
            Some("flac") => "audio/flac",
            Some("wav") => "audio/wav",
            Some("m4a") | Some("mp4") => "audio/mp4",
            Some("aac") => "audio/aac",
            Some("opus") => "audio/opus",
            _ => "application/octet-stream",
        }
    }
}
