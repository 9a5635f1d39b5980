use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::track::Track;

/// Tracks in import order, unique by path.
#[derive(Debug)]
pub struct Playlist<H> {
    tracks: Vec<Track<H>>,
    keys: HashSet<PathBuf>,
}

impl<H> Default for Playlist<H> {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            keys: HashSet::new(),
        }
    }
}

impl<H> Playlist<H> {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.keys.contains(key)
    }

    pub fn position(&self, key: &Path) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        self.tracks.iter().position(|t| t.path() == key)
    }

    pub fn get(&self, index: usize) -> Option<&Track<H>> {
        self.tracks.get(index)
    }

    pub fn find(&self, key: &Path) -> Option<&Track<H>> {
        self.position(key).and_then(|i| self.tracks.get(i))
    }

    pub fn as_slice(&self) -> &[Track<H>] {
        &self.tracks
    }

    /// First track after `index` that can actually be played.
    pub fn next_playable_after(&self, index: usize) -> Option<usize> {
        self.tracks
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, t)| t.is_playable())
            .map(|(i, _)| i)
    }

    pub(super) fn get_mut(&mut self, index: usize) -> Option<&mut Track<H>> {
        self.tracks.get_mut(index)
    }

    pub(super) fn find_mut(&mut self, key: &Path) -> Option<&mut Track<H>> {
        let index = self.position(key)?;
        self.tracks.get_mut(index)
    }

    /// Append `track` unless its path is already present.
    pub(super) fn push(&mut self, track: Track<H>) -> Result<(), Track<H>> {
        if !self.keys.insert(track.path().to_path_buf()) {
            return Err(track);
        }
        self.tracks.push(track);
        Ok(())
    }

    pub(super) fn remove(&mut self, index: usize) -> Option<Track<H>> {
        if index >= self.tracks.len() {
            return None;
        }
        let track = self.tracks.remove(index);
        self.keys.remove(track.path());
        Some(track)
    }

    pub(super) fn drain(&mut self) -> impl Iterator<Item = Track<H>> + '_ {
        self.keys.clear();
        self.tracks.drain(..)
    }
}
