use rand::seq::SliceRandom;
use uuid::Uuid;

use super::track::{PublicTrack, Track};

/// The ordered track sequence. Invariant: track ids are unique.
///
/// Cursor adjustment for index-shifting operations lives in the station
/// aggregate, which mutates the playlist and the playback clock under one
/// lock.
#[derive(Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn extend(&mut self, tracks: Vec<Track>) {
        self.tracks.extend(tracks);
    }

    /// Caller validates the index.
    pub fn remove_at(&mut self, index: usize) -> Track {
        self.tracks.remove(index)
    }

    /// Relocate an element. Caller validates both indices.
    pub fn relocate(&mut self, from: usize, to: usize) {
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
    }

    /// Unbiased uniform permutation (Fisher-Yates).
    pub fn shuffle(&mut self) {
        self.tracks.shuffle(&mut rand::thread_rng());
    }

    pub fn public_list(&self) -> Vec<PublicTrack> {
        self.tracks.iter().map(Track::public).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn online(title: &str) -> Track {
        Track::online(
            format!("https://example.com/{title}.mp3"),
            title.to_string(),
            "Artist".to_string(),
            120,
        )
    }

    #[test]
    fn shuffle_is_a_permutation_of_the_same_ids() {
        let tracks: Vec<Track> = (0..20).map(|i| online(&format!("t{i}"))).collect();
        let before: HashSet<Uuid> = tracks.iter().map(|t| t.id).collect();

        let mut playlist = Playlist::new(tracks);
        playlist.shuffle();

        let after: HashSet<Uuid> = playlist.tracks().iter().map(|t| t.id).collect();
        assert_eq!(before, after);
        assert_eq!(playlist.len(), 20);
    }

    #[test]
    fn relocate_then_relocate_back_restores_order() {
        let tracks: Vec<Track> = (0..5).map(|i| online(&format!("t{i}"))).collect();
        let original: Vec<Uuid> = tracks.iter().map(|t| t.id).collect();

        let mut playlist = Playlist::new(tracks);
        playlist.relocate(1, 3);
        playlist.relocate(3, 1);

        let restored: Vec<Uuid> = playlist.tracks().iter().map(|t| t.id).collect();
        assert_eq!(original, restored);
    }
}
