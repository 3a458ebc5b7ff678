use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
    pub mpris: MprisSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// How often the audio thread samples the playback position (milliseconds).
    pub position_poll_ms: u64,
    /// Volume applied at startup, 0..=100.
    pub initial_volume: u8,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
            position_poll_ms: 200,
            initial_volume: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Title rendered in the header box.
    pub window_title: String,
    /// Track label shown before any track has been loaded.
    pub empty_track_label: String,
    /// Period of the timer that re-renders the time label while playing (milliseconds).
    pub refresh_interval_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_title: "Player".to_string(),
            empty_track_label: "Nothing selected".to_string(),
            refresh_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change applied by `+` / `-`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Move on to the next track when one cannot be loaded.
    pub skip_unplayable: bool,
    /// Start the next track (wrapping around) when the current one ends.
    pub advance_on_end: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            skip_unplayable: true,
            advance_on_end: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File name endings treated as audio. Matching is case-sensitive.
    pub suffixes: Vec<String>,
    /// Whether symlinked files are followed when listing a folder.
    pub follow_links: bool,
    /// Whether dotfiles are listed.
    pub include_hidden: bool,
    /// Folder opened at startup when none is given on the command line.
    pub default_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            suffixes: vec![".mp3".to_string()],
            follow_links: true,
            include_hidden: true,
            default_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `env_logger` filter; `RUST_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/cadence/cadence.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MprisSettings {
    /// Register an MPRIS service on the session bus.
    pub enabled: bool,
}

impl Default for MprisSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}
