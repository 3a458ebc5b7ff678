//! MPRIS2 service so desktop media keys and `playerctl` can drive the player.
//!
//! The bus side only reads a snapshot kept in `MprisHandle` and forwards method
//! calls as `ControlCmd`s; the event loop stays the single owner of `App`.

use std::collections::HashMap;
use std::future;
use std::path::Path;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::block_on;
use log::{debug, info, warn};
use zbus::{connection, interface};
use zvariant::{OwnedValue, Value};

use crate::app::PlaybackState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.cadence";

/// Requests coming from the bus, handled by the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct Snapshot {
    playback: PlaybackState,
    title: Option<String>,
    url: Option<String>,
    /// 0.0..=1.0, as MPRIS wants it.
    volume: f64,
}

/// Write side of what the bus publishes.
#[derive(Clone)]
pub struct MprisHandle {
    snapshot: Arc<Mutex<Snapshot>>,
}

impl MprisHandle {
    fn new() -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Snapshot::default())),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Snapshot)) {
        if let Ok(mut s) = self.snapshot.lock() {
            f(&mut s);
        }
    }

    pub fn set_playback(&self, playback: PlaybackState) {
        self.update(|s| s.playback = playback);
    }

    /// Publish the loaded file, or clear it with `None`.
    pub fn set_track(&self, track: Option<(&str, &Path)>) {
        self.update(|s| {
            s.title = track.map(|(title, _)| title.to_string());
            s.url = track.map(|(_, path)| format!("file://{}", path.display()));
        });
    }

    pub fn set_volume(&self, level: u8) {
        self.update(|s| s.volume = f64::from(level.min(100)) / 100.0);
    }
}

/// Forwards bus calls into the event loop.
#[derive(Clone)]
struct Remote {
    tx: Sender<ControlCmd>,
}

impl Remote {
    fn send(&self, cmd: ControlCmd) {
        if self.tx.send(cmd).is_err() {
            debug!("MPRIS: event loop is gone");
        }
    }
}

struct Root {
    remote: Remote,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl Root {
    fn raise(&self) {}

    fn quit(&self) {
        self.remote.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadence"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec!["audio/mpeg".to_string()]
    }
}

struct Player {
    remote: Remote,
    snapshot: Arc<Mutex<Snapshot>>,
}

impl Player {
    fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T, fallback: T) -> T {
        self.snapshot.lock().map(|s| f(&s)).unwrap_or(fallback)
    }
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(v) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), v);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl Player {
    fn next(&self) {
        self.remote.send(ControlCmd::Next);
    }

    fn previous(&self) {
        self.remote.send(ControlCmd::Prev);
    }

    fn play(&self) {
        self.remote.send(ControlCmd::Play);
    }

    fn pause(&self) {
        self.remote.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        self.remote.send(ControlCmd::PlayPause);
    }

    /// There is no stopped transport; stopping pauses.
    fn stop(&self) {
        self.remote.send(ControlCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.read(|s| s.playback, PlaybackState::Stopped) {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn volume(&self) -> f64 {
        self.read(|s| s.volume, 0.0)
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let (title, url) = self.read(|s| (s.title.clone(), s.url.clone()), (None, None));

        let mut map = HashMap::new();
        insert_value(&mut map, "xesam:title", Value::from(title.unwrap_or_default()));
        if let Some(url) = url {
            insert_value(&mut map, "xesam:url", Value::from(url));
        }
        map
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }
}

async fn serve(remote: Remote, snapshot: Arc<Mutex<Snapshot>>) -> zbus::Result<()> {
    let _connection = connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(
            OBJECT_PATH,
            Root {
                remote: remote.clone(),
            },
        )?
        .serve_at(OBJECT_PATH, Player { remote, snapshot })?
        .build()
        .await?;

    info!("MPRIS: serving {BUS_NAME}");
    future::pending::<()>().await;
    Ok(())
}

/// Register the service on the session bus from a background thread.
///
/// Failures are logged and leave the player running without MPRIS.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let handle = MprisHandle::new();

    let snapshot = handle.snapshot.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(Remote { tx }, snapshot)) {
            warn!("MPRIS: unavailable: {e}");
        }
    });

    handle
}

#[cfg(test)]
mod tests;
