use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::debug;

use crate::config::AudioSettings;
use crate::error::EngineError;

use super::thread::spawn_audio_thread;
use super::types::{
    AudioCmd, EngineEvent, LoadId, MediaEngine, PlaybackHandle, PlaybackInfo,
};

/// `MediaEngine` backed by a rodio sink living on a dedicated audio thread.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    events: Receiver<EngineEvent>,
    playback: PlaybackHandle,
    next_load: LoadId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Spawn the audio thread and open the default output device.
    pub fn new(audio_settings: &AudioSettings) -> Result<Self, EngineError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<EngineEvent>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(
            rx,
            playback_info.clone(),
            events_tx,
            ready_tx,
            audio_settings.clone(),
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = audio_handle.join();
                return Err(e);
            }
            Err(_) => return Err(EngineError::Disconnected),
        }

        Ok(Self {
            tx,
            events: events_rx,
            playback: playback_info,
            next_load: 0,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            debug!("audio thread is gone, dropping command");
        }
    }

    /// Fade out, stop the audio thread and wait for it to exit.
    pub fn shutdown(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl MediaEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> LoadId {
        self.next_load += 1;
        let load = self.next_load;
        self.send(AudioCmd::Load {
            load,
            path: path.to_path_buf(),
        });
        load
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn is_playing(&self) -> bool {
        self.playback.lock().map(|info| info.playing).unwrap_or(false)
    }

    fn set_volume(&mut self, level: u8) {
        self.send(AudioCmd::SetVolume(level.min(100)));
    }

    fn set_position(&mut self, position_ms: u64) {
        self.send(AudioCmd::Seek(position_ms));
    }

    fn position(&self) -> u64 {
        self.playback
            .lock()
            .map(|info| info.position.as_millis() as u64)
            .unwrap_or(0)
    }

    fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }
}
