use std::time::Instant;

/// The play cursor of the single global station.
///
/// `current` is a valid playlist index whenever `is_playing` and the
/// playlist is non-empty; it survives a pause so the next play resumes
/// advance semantics from the last known position.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    pub is_playing: bool,
    pub current: Option<usize>,
    pub started_at: Option<Instant>,
}

impl PlaybackClock {
    /// Seconds since the current track started. 0 when stopped.
    pub fn elapsed_secs(&self) -> f64 {
        if !self.is_playing {
            return 0.0;
        }
        self.started_at
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.started_at = None;
    }

    pub fn clear(&mut self) {
        self.is_playing = false;
        self.current = None;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_zero_when_stopped() {
        let mut clock = PlaybackClock::default();
        clock.current = Some(3);
        clock.started_at = Some(Instant::now());
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn pause_keeps_cursor_but_clears_clock() {
        let mut clock = PlaybackClock {
            is_playing: true,
            current: Some(2),
            started_at: Some(Instant::now()),
        };
        clock.stop();
        assert_eq!(clock.current, Some(2));
        assert!(clock.started_at.is_none());
        assert!(!clock.is_playing);
    }
}
