use crate::station::track::Track;

use super::{is_valid_url, title_from_url};

/// Parse M3U/EXTM3U or PLS text into online tracks.
///
/// Entries that are not absolute http(s) URLs are skipped; a malformed
/// line never fails the whole import.
pub fn parse(content: &str) -> Vec<Track> {
    if content
        .lines()
        .next()
        .map(|l| l.trim().eq_ignore_ascii_case("[playlist]"))
        .unwrap_or(false)
    {
        parse_pls(content)
    } else {
        parse_m3u(content)
    }
}

fn parse_m3u(content: &str) -> Vec<Track> {
    let mut tracks = Vec::new();
    // Pending metadata from the most recent #EXTINF line.
    let mut pending: Option<(u64, String, String)> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("#EXTINF:") {
            pending = parse_extinf(rest);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if !is_valid_url(line) {
            pending = None;
            continue;
        }
        let (duration, artist, title) = pending.take().unwrap_or_else(|| {
            (0, String::new(), title_from_url(line))
        });
        tracks.push(Track::online(line.to_string(), title, artist, duration));
    }
    tracks
}

/// `#EXTINF:<seconds>,Artist - Title` (artist part optional).
fn parse_extinf(rest: &str) -> Option<(u64, String, String)> {
    let (duration_part, info) = rest.split_once(',')?;
    let duration = duration_part
        .trim()
        .parse::<i64>()
        .map(|d| d.max(0) as u64)
        .unwrap_or(0);
    let info = info.trim();
    let (artist, title) = match info.split_once(" - ") {
        Some((artist, title)) => (artist.trim().to_string(), title.trim().to_string()),
        None => (String::new(), info.to_string()),
    };
    Some((duration, artist, title))
}

fn parse_pls(content: &str) -> Vec<Track> {
    // PLS indexes entries as File1=, Title1=, Length1=.
    let mut files: Vec<(u32, String)> = Vec::new();
    let mut titles: Vec<(u32, String)> = Vec::new();
    let mut lengths: Vec<(u32, i64)> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if let Some(n) = numbered_key(key, "File") {
            files.push((n, value.to_string()));
        } else if let Some(n) = numbered_key(key, "Title") {
            titles.push((n, value.to_string()));
        } else if let Some(n) = numbered_key(key, "Length") {
            if let Ok(len) = value.parse::<i64>() {
                lengths.push((n, len));
            }
        }
    }

    files.sort_by_key(|(n, _)| *n);
    let mut tracks = Vec::new();
    for (n, url) in files {
        if !is_valid_url(&url) {
            continue;
        }
        let title = titles
            .iter()
            .find(|(tn, _)| *tn == n)
            .map(|(_, t)| t.clone())
            .unwrap_or_else(|| title_from_url(&url));
        // -1 marks an endless stream in PLS; treated as unknown duration.
        let duration = lengths
            .iter()
            .find(|(ln, _)| *ln == n)
            .map(|(_, l)| (*l).max(0) as u64)
            .unwrap_or(0);
        tracks.push(Track::online(url, title, String::new(), duration));
    }
    tracks
}

fn numbered_key(key: &str, prefix: &str) -> Option<u32> {
    key.strip_prefix(prefix)?.parse().ok()
}
