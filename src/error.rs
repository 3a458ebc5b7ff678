//! Error types shared by the playlist and engine layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a folder into a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The folder was readable but held no recognized audio files.
    #[error("no playable tracks in {}", .dir.display())]
    EmptyFolder { dir: PathBuf },

    #[error("cannot read folder {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failures raised by the audio engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    OutputUnavailable(String),

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// The audio thread exited before it could answer.
    #[error("audio thread is gone")]
    Disconnected,
}
