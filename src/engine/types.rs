//! Engine-facing types: the capability trait the controller drives, the
//! notifications it reacts to, and the command/state plumbing of the rodio
//! backend.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Identifies one `load` call. Increases monotonically per engine.
pub type LoadId = u64;

/// Playback capability consumed by the controller.
///
/// Commands are fire-and-forget; results come back through
/// [`MediaEngine::try_next_event`], tagged with the [`LoadId`] they belong to.
pub trait MediaEngine {
    /// Replace the current media with `path`, paused at the start.
    fn load(&mut self, path: &Path) -> LoadId;
    fn play(&mut self);
    fn pause(&mut self);
    /// Live playing state; never a cached intent.
    fn is_playing(&self) -> bool;
    /// Volume level in `0..=100`.
    fn set_volume(&mut self, level: u8);
    /// Seek to `position_ms`. The engine clamps to the media length.
    fn set_position(&mut self, position_ms: u64);
    /// Current position in milliseconds.
    fn position(&self) -> u64;
    /// Next pending notification, if any.
    fn try_next_event(&mut self) -> Option<EngineEvent>;
}

/// Notifications emitted by an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The length of the loaded media became known.
    DurationKnown { load: LoadId, duration_ms: u64 },
    /// The playback position moved.
    PositionChanged { load: LoadId, position_ms: u64 },
    /// The end of the media was reached while playing.
    Finished { load: LoadId },
    /// The media could not be opened or decoded.
    LoadFailed {
        load: LoadId,
        path: PathBuf,
        reason: String,
    },
}

impl EngineEvent {
    pub fn load_id(&self) -> LoadId {
        match self {
            Self::DurationKnown { load, .. }
            | Self::PositionChanged { load, .. }
            | Self::Finished { load }
            | Self::LoadFailed { load, .. } => *load,
        }
    }
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Load `path` into a fresh paused sink.
    Load { load: LoadId, path: PathBuf },
    /// Resume or start the current sink.
    Play,
    /// Pause the current sink.
    Pause,
    /// Set volume, 0..=100.
    SetVolume(u8),
    /// Seek to an absolute position in milliseconds.
    Seek(u64),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI thread.
#[derive(Debug, Clone, Default)]
pub(super) struct PlaybackInfo {
    /// Last sampled playback position.
    pub position: Duration,
    /// Whether the sink is audibly playing.
    pub playing: bool,
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
