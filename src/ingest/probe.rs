use std::path::Path;

use symphonia::core::{
    codecs::CODEC_TYPE_NULL,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::{MetadataOptions, StandardTagKey},
    probe::Hint,
};
use tracing::debug;

use super::TrackMeta;

/// Probe a stored audio file for duration and display tags.
///
/// Blocking; call through [`probe`] from async contexts.
pub fn probe_file(path: &str) -> Result<TrackMeta, Box<dyn std::error::Error + Send + Sync>> {
    let file = std::fs::File::open(path)?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    let mut hint = Hint::new();
    if let Some(ref e) = ext {
        hint.with_extension(e);
    }

    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or("no audio track found")?;

    // Duration in whole seconds; 0 when the container does not declare one.
    let duration = if let Some(n_frames) = track.codec_params.n_frames {
        if let Some(rate) = track.codec_params.sample_rate {
            (n_frames as f64 / rate as f64).round() as u64
        } else {
            0
        }
    } else {
        0
    };

    let mut meta = TrackMeta {
        duration,
        ..Default::default()
    };

    if let Some(rev) = format.metadata().current() {
        for tag in rev.tags() {
            match tag.std_key {
                Some(StandardTagKey::TrackTitle) => meta.title = tag.value.to_string(),
                Some(StandardTagKey::Artist) | Some(StandardTagKey::AlbumArtist) => {
                    if meta.artist.is_empty() {
                        meta.artist = tag.value.to_string();
                    }
                }
                Some(StandardTagKey::Album) => meta.album = tag.value.to_string(),
                Some(StandardTagKey::Genre) => meta.genre = tag.value.to_string(),
                Some(StandardTagKey::Date) | Some(StandardTagKey::ReleaseDate) => {
                    if meta.year.is_none() {
                        meta.year = parse_year(&tag.value.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    // Fallback: use the filename without extension as the title
    if meta.title.is_empty() {
        meta.title = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unknown")
            .to_string();
    }
    if meta.artist.is_empty() {
        meta.artist = "Unknown Artist".to_string();
    }

    debug!(
        "Probed '{}': title='{}' artist='{}' duration={}s",
        path, meta.title, meta.artist, meta.duration
    );
    Ok(meta)
}

/// Async wrapper; symphonia probing is file I/O plus parsing.
pub async fn probe(path: String) -> Result<TrackMeta, String> {
    tokio::task::spawn_blocking(move || probe_file(&path))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Dates in tags arrive as "1994", "1994-06-21" and similar.
fn parse_year(value: &str) -> Option<i32> {
    value
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 4)
        .and_then(|part| part.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_from_tag_formats() {
        assert_eq!(parse_year("1994"), Some(1994));
        assert_eq!(parse_year("1994-06-21"), Some(1994));
        assert_eq!(parse_year("21/06/1994"), Some(1994));
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn probe_of_a_missing_file_fails() {
        assert!(probe_file("/nonexistent/file.mp3").is_err());
    }
}
