use std::path::Path;

use crate::config::LibrarySettings;
use crate::error::PlaylistError;

use super::model::Track;
use super::scan::list_folder;

/// Ordered tracks of the open folder plus the current-track index.
///
/// The index is `Some` exactly when the playlist is non-empty and always lies
/// in `0..len`. Navigation is circular in both directions.
#[derive(Debug, Default)]
pub struct PlaylistController {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlaylistController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the playlist with the audio files of `dir`.
    ///
    /// The old playlist is always discarded. An empty folder leaves the
    /// playlist empty and reports [`PlaylistError::EmptyFolder`]; a read error
    /// leaves the previous playlist untouched.
    pub fn load_folder(
        &mut self,
        dir: &Path,
        settings: &LibrarySettings,
    ) -> Result<usize, PlaylistError> {
        let tracks = list_folder(dir, settings)?;
        self.replace(tracks);
        if self.is_empty() {
            return Err(PlaylistError::EmptyFolder {
                dir: dir.to_path_buf(),
            });
        }
        Ok(self.len())
    }

    /// Swap in `tracks` wholesale and reset the index to the first track.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.current = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Point the index at `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.current = Some(index);
        }
        self.current()
    }

    /// Advance one track, wrapping from the last to the first.
    pub fn next(&mut self) -> Option<&Track> {
        self.step(1)
    }

    /// Go back one track, wrapping from the first to the last.
    pub fn previous(&mut self) -> Option<&Track> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<&Track> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let from = self.current.unwrap_or(0);
        self.current = Some(wrap_index(from, delta, len));
        self.current()
    }
}

/// `(index + delta) mod len`, always in `0..len` (true modulo, not remainder).
pub(crate) fn wrap_index(index: usize, delta: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    (index as isize + delta).rem_euclid(len as isize) as usize
}
