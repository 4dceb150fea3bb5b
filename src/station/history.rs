use std::collections::VecDeque;

use super::track::{PlayedTrack, PublicTrack};

/// Bounded log of past-played tracks, oldest evicted at capacity.
#[derive(Debug)]
pub struct HistoryLog {
    entries: VecDeque<PlayedTrack>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(50)
    }
}

impl HistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, track: PublicTrack, played_at: u64) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(PlayedTrack { track, played_at });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last `n` entries in insertion order, oldest of the `n` first.
    pub fn recent(&self, n: usize) -> Vec<PlayedTrack> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Last `n` entries, most recent first.
    pub fn recent_newest_first(&self, n: usize) -> Vec<PlayedTrack> {
        self.entries.iter().rev().take(n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::track::Track;

    fn public(title: &str) -> PublicTrack {
        Track::online(
            format!("https://example.com/{title}.mp3"),
            title.to_string(),
            "Artist".to_string(),
            60,
        )
        .public()
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = HistoryLog::with_capacity(3);
        for i in 0..5 {
            log.push(public(&format!("t{i}")), i);
        }
        assert_eq!(log.len(), 3);
        let recent = log.recent(3);
        assert_eq!(recent[0].track.title, "t2");
        assert_eq!(recent[2].track.title, "t4");
    }

    #[test]
    fn recent_views_are_ordered() {
        let mut log = HistoryLog::default();
        for i in 0..15 {
            log.push(public(&format!("t{i}")), i);
        }
        let oldest_first = log.recent(10);
        assert_eq!(oldest_first.first().unwrap().track.title, "t5");
        assert_eq!(oldest_first.last().unwrap().track.title, "t14");

        let newest_first = log.recent_newest_first(20);
        assert_eq!(newest_first.len(), 15);
        assert_eq!(newest_first.first().unwrap().track.title, "t14");
    }
}
