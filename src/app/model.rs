//! Application model: `App` glues the playlist, the transport and the engine
//! notifications together and keeps the `View` current.

use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{LibrarySettings, PlaybackSettings, Settings};
use crate::engine::{EngineEvent, LoadId, MediaEngine};
use crate::error::PlaylistError;
use crate::playlist::{PlaylistController, Track};
use crate::time_display::{format_position, initial_label};
use crate::transport::{TransportIntent, TransportState};

use super::prompt::FolderPrompt;
use super::view::View;

/// Playback state derived from the engine, for display and MPRIS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The main application model.
pub struct App<E: MediaEngine> {
    engine: E,
    playlist: PlaylistController,
    transport: TransportState,
    library: LibrarySettings,
    playback: PlaybackSettings,

    /// Load whose notifications are currently honoured.
    current_load: Option<LoadId>,
    /// Loads that failed back to back; bounds automatic skipping.
    failed_streak: usize,

    pub view: View,
    /// List cursor; independent of the playing track until a track loads.
    pub selected: usize,
    pub prompt: Option<FolderPrompt>,
    pub current_dir: Option<PathBuf>,
}

impl<E: MediaEngine> App<E> {
    /// Create the model around `engine` and push the initial volume to it.
    pub fn new(engine: E, settings: &Settings) -> Self {
        let volume = settings.audio.initial_volume.min(100);
        let mut app = Self {
            engine,
            playlist: PlaylistController::new(),
            transport: TransportState::new(Duration::from_millis(
                settings.ui.refresh_interval_ms.max(1),
            )),
            library: settings.library.clone(),
            playback: settings.playback.clone(),
            current_load: None,
            failed_streak: 0,
            view: View::new(&settings.ui, volume),
            selected: 0,
            prompt: None,
            current_dir: None,
        };
        app.transport.set_volume(&mut app.engine, volume);
        app
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Index of the track handed to the engine last.
    pub fn current_index(&self) -> Option<usize> {
        self.current_load.and(self.playlist.current_index())
    }

    /// Id of the load whose notifications are honoured.
    pub fn current_load(&self) -> Option<LoadId> {
        self.current_load
    }

    pub fn playback_state(&self) -> PlaybackState {
        if self.current_load.is_none() {
            return PlaybackState::Stopped;
        }
        if self.engine.is_playing() {
            return PlaybackState::Playing;
        }
        match self.transport.intent() {
            Some(TransportIntent::Paused) => PlaybackState::Paused,
            // Meant to play but the engine is idle: ended or failed.
            _ => PlaybackState::Stopped,
        }
    }

    /// Replace the playlist with the audio files in `dir` and start the first one.
    ///
    /// An empty or unreadable folder starts nothing. An empty folder is only
    /// logged; a read failure also goes on the status line.
    pub fn open_folder(&mut self, dir: &Path, now: Instant) -> Result<usize, PlaylistError> {
        match self.playlist.load_folder(dir, &self.library) {
            Ok(n) => {
                info!("opened {} with {n} tracks", dir.display());
                self.current_dir = Some(dir.to_path_buf());
                self.view.status = None;
                self.start_playlist(now);
                Ok(n)
            }
            Err(e) => {
                match &e {
                    PlaylistError::EmptyFolder { .. } => {
                        info!("{e}");
                        self.current_dir = Some(dir.to_path_buf());
                        self.selected = 0;
                        self.view.status = None;
                    }
                    PlaylistError::ReadDir { .. } => {
                        warn!("{e}");
                        self.view.status = Some(e.to_string());
                    }
                }
                Err(e)
            }
        }
    }

    /// Replace the playlist with `tracks` and start the first one, if any.
    pub fn load_tracks(&mut self, tracks: Vec<Track>, now: Instant) {
        self.playlist.replace(tracks);
        self.start_playlist(now);
    }

    fn start_playlist(&mut self, now: Instant) {
        self.selected = 0;
        self.failed_streak = 0;
        if self.has_tracks() {
            self.play_current(now);
        }
    }

    /// Hand the current track to the engine and start it.
    pub fn play_current(&mut self, now: Instant) {
        let Some(track) = self.playlist.current() else {
            return;
        };
        let path = track.path.clone();
        let title = track.title().into_owned();

        debug!("loading {}", path.display());
        self.current_load = Some(self.engine.load(&path));
        self.view.track_label = title;
        self.view.position_max = 0;
        self.view.position_value = 0;
        self.transport.start_playing(&mut self.engine, now);

        if let Some(i) = self.playlist.current_index() {
            self.selected = i;
        }
    }

    pub fn next_track(&mut self, now: Instant) {
        self.failed_streak = 0;
        self.advance(now);
    }

    pub fn previous_track(&mut self, now: Instant) {
        self.failed_streak = 0;
        if self.playlist.previous().is_some() {
            self.play_current(now);
        }
    }

    fn advance(&mut self, now: Instant) {
        if self.playlist.next().is_some() {
            self.play_current(now);
        }
    }

    /// Play the track under the list cursor.
    pub fn play_selected(&mut self, now: Instant) {
        if self.playlist.select(self.selected).is_some() {
            self.failed_streak = 0;
            self.play_current(now);
        }
    }

    pub fn play_pause(&mut self, now: Instant) -> TransportIntent {
        self.transport.toggle_play_pause(&mut self.engine, now)
    }

    pub fn change_volume(&mut self, level: u8) {
        let level = level.min(100);
        self.view.volume = level;
        self.transport.set_volume(&mut self.engine, level);
    }

    /// Move the volume by `delta`, staying in `0..=100` like a slider would.
    pub fn nudge_volume(&mut self, delta: i16) {
        let level = (i16::from(self.view.volume) + delta).clamp(0, 100) as u8;
        self.change_volume(level);
    }

    /// Seek to `position_ms`, as if the position slider had been dragged there.
    pub fn set_position(&mut self, position_ms: u64) {
        self.view.position_value = position_ms;
        self.transport.seek(&mut self.engine, position_ms);
    }

    /// Move the position slider by `delta_ms`, clamped to its range.
    pub fn scrub(&mut self, delta_ms: i64) {
        let max = self.view.position_max as i64;
        let target = (self.view.position_value as i64).saturating_add(delta_ms);
        self.set_position(target.clamp(0, max) as u64);
    }

    /// React to one engine notification. Events of superseded loads are dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent, now: Instant) {
        if Some(event.load_id()) != self.current_load {
            debug!("ignoring stale engine event {event:?}");
            return;
        }

        match event {
            EngineEvent::DurationKnown { duration_ms, .. } => {
                self.failed_streak = 0;
                self.view.position_max = duration_ms;
                self.view.time_label = initial_label(duration_ms);
            }
            EngineEvent::PositionChanged { position_ms, .. } => {
                self.view.position_value = position_ms;
            }
            EngineEvent::Finished { .. } => {
                if self.playback.advance_on_end {
                    self.advance(now);
                }
            }
            EngineEvent::LoadFailed { path, reason, .. } => {
                warn!("cannot play {}: {reason}", path.display());
                self.view.status = Some(reason);
                self.failed_streak += 1;
                if self.playback.skip_unplayable && self.failed_streak < self.playlist.len() {
                    self.advance(now);
                }
            }
        }
    }

    /// Drain every pending engine notification.
    pub fn pump_engine_events(&mut self, now: Instant) {
        while let Some(event) = self.engine.try_next_event() {
            self.handle_engine_event(event, now);
        }
    }

    /// Timer tick: refresh the time label, but only while the engine plays.
    pub fn tick(&mut self, now: Instant) {
        if self.transport.poll_due(now) && self.engine.is_playing() {
            self.view.time_label =
                format_position(self.engine.position(), self.view.position_max);
        }
    }

    pub fn timer_running(&self) -> bool {
        self.transport.timer().is_running()
    }

    /// Move the list cursor by `delta`, wrapping around.
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.playlist.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(len as isize) as usize;
    }

    pub fn cursor_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn cursor_to_last(&mut self) {
        self.selected = self.playlist.len().saturating_sub(1);
    }

    /// Open the folder prompt, prefilled with the last folder or the working directory.
    pub fn open_prompt(&mut self) {
        let initial = self
            .current_dir
            .clone()
            .or_else(|| env::current_dir().ok())
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.prompt = Some(FolderPrompt::new(initial));
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Close the prompt and open whatever folder it holds. `None` when cancelled.
    pub fn submit_prompt(&mut self, now: Instant) -> Option<Result<usize, PlaylistError>> {
        let dir = self.prompt.take()?.submit()?;
        Some(self.open_folder(&dir, now))
    }
}
