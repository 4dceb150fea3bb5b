pub mod playlist_text;
pub mod probe;

pub use probe::probe;

/// Display tags and duration extracted from an audio file.
#[derive(Debug, Clone, Default)]
pub struct TrackMeta {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: Option<i32>,
    /// Seconds; 0 when the container declares none.
    pub duration: u64,
}

/// Display title fallback for URL tracks: the last path segment.
pub fn title_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}

/// Online track sources must be absolute http(s) URLs.
pub fn is_valid_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(rest) => !rest.is_empty() && !rest.starts_with('/') && !rest.contains(char::is_whitespace),
        None => false,
    }
}
