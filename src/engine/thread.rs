use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, SyncSender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;
use crate::error::EngineError;

use super::sink::{create_sink_at, gain};
use super::types::{AudioCmd, EngineEvent, LoadId, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    events: Sender<EngineEvent>,
    ready: SyncSender<Result<(), EngineError>>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(EngineError::OutputUnavailable(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut deck = Deck::new(
            stream,
            playback_info,
            events,
            gain(audio_settings.initial_volume),
        );
        let poll_every = Duration::from_millis(audio_settings.position_poll_ms.max(1));

        loop {
            match rx.recv_timeout(poll_every) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Ok(AudioCmd::Load { load, path }) => deck.load(load, path),
                Ok(AudioCmd::Play) => deck.play(),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::SetVolume(level)) => deck.set_volume(level),
                Ok(AudioCmd::Seek(ms)) => deck.seek(ms),
                // Periodic position sampling and end-of-media detection.
                Err(RecvTimeoutError::Timeout) => deck.poll(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread stopped");
    })
}

/// Everything the audio thread owns for the media currently loaded.
struct Deck {
    stream: OutputStream,
    info: PlaybackHandle,
    events: Sender<EngineEvent>,
    volume: f32,

    load: Option<LoadId>,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    duration: Option<Duration>,
    playing: bool,

    // Offset added to `Sink::get_pos` after a sink was rebuilt mid-track.
    base: Duration,
    position: Duration,
    last_reported: Option<u64>,
}

impl Deck {
    fn new(
        stream: OutputStream,
        info: PlaybackHandle,
        events: Sender<EngineEvent>,
        volume: f32,
    ) -> Self {
        Self {
            stream,
            info,
            events,
            volume,
            load: None,
            path: None,
            sink: None,
            duration: None,
            playing: false,
            base: Duration::ZERO,
            position: Duration::ZERO,
            last_reported: None,
        }
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.position = self.position;
            info.playing = self.playing;
        }
    }

    fn load(&mut self, load: LoadId, path: PathBuf) {
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.load = Some(load);
        self.playing = false;
        self.base = Duration::ZERO;
        self.position = Duration::ZERO;
        self.last_reported = None;

        match create_sink_at(&self.stream, &path, Duration::ZERO, self.volume) {
            Ok(loaded) => {
                debug!("loaded {} (load {load})", path.display());
                self.sink = Some(loaded.sink);
                self.duration = loaded.duration;
                self.path = Some(path);
                self.publish();
                if let Some(d) = self.duration {
                    self.emit(EngineEvent::DurationKnown {
                        load,
                        duration_ms: d.as_millis() as u64,
                    });
                }
            }
            Err(e) => {
                warn!("{e}");
                self.duration = None;
                self.path = None;
                self.publish();
                self.emit(EngineEvent::LoadFailed {
                    load,
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn play(&mut self) {
        let finished = match self.sink.as_ref() {
            Some(s) => s.empty(),
            None => return,
        };
        if finished {
            // Playing again after the end restarts the track.
            self.rebuild_at(Duration::ZERO);
        }
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.playing = true;
            self.publish();
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.position = self.base + s.get_pos();
            self.playing = false;
            self.publish();
        }
    }

    fn set_volume(&mut self, level: u8) {
        self.volume = gain(level);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn seek(&mut self, ms: u64) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        let target = clamp_seek(Duration::from_millis(ms), self.duration);

        match s.try_seek(target) {
            Ok(()) => self.base = Duration::ZERO,
            Err(e) => {
                debug!("seek via decoder failed ({e}), rebuilding sink");
                self.rebuild_at(target);
            }
        }

        self.position = target;
        let position_ms = target.as_millis() as u64;
        self.last_reported = Some(position_ms);
        self.publish();
        if let Some(load) = self.load {
            self.emit(EngineEvent::PositionChanged { load, position_ms });
        }
    }

    /// Replace the sink with a fresh one skipped to `start_at`, keeping the
    /// play/pause state.
    fn rebuild_at(&mut self, start_at: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        match create_sink_at(&self.stream, &path, start_at, self.volume) {
            Ok(loaded) => {
                if self.playing {
                    loaded.sink.play();
                }
                self.sink = Some(loaded.sink);
                self.base = start_at;
            }
            Err(e) => {
                warn!("{e}");
                self.playing = false;
                self.publish();
            }
        }
    }

    fn poll(&mut self) {
        if !self.playing {
            return;
        }
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        let Some(load) = self.load else {
            return;
        };

        if s.empty() {
            self.playing = false;
            if let Some(d) = self.duration {
                self.position = d;
            }
            self.publish();
            self.emit(EngineEvent::Finished { load });
            return;
        }

        self.position = self.base + s.get_pos();
        let position_ms = self.position.as_millis() as u64;
        self.publish();
        if self.last_reported != Some(position_ms) {
            self.last_reported = Some(position_ms);
            self.emit(EngineEvent::PositionChanged { load, position_ms });
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.take() {
            if self.playing {
                fade_out_sink(&s, self.volume, fade_out_ms);
            }
            s.stop();
        }
        // Update shared state so UI/MPRIS don't keep showing Playing.
        self.playing = false;
        self.publish();
    }
}

/// Clamp a seek target to the media length, when known.
pub(super) fn clamp_seek(target: Duration, duration: Option<Duration>) -> Duration {
    match duration {
        Some(d) => target.min(d),
        None => target,
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
