//! Play/pause transport and the time-label polling timer.
//!
//! The "is it playing" answer always comes from the engine; the timer only
//! runs while playback is intended, so nothing polls while paused.

use std::time::{Duration, Instant};

use crate::engine::MediaEngine;

/// Whether playback is meant to be running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportIntent {
    Playing,
    Paused,
}

/// Fixed-interval timer driven by the event loop's clock.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// (Re)arm the timer; the first tick is one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Return true once per elapsed interval. Missed ticks are not replayed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct TransportState {
    intent: Option<TransportIntent>,
    timer: PollTimer,
}

impl TransportState {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            intent: None,
            timer: PollTimer::new(refresh_interval),
        }
    }

    /// `None` until the first track has been loaded.
    pub fn intent(&self) -> Option<TransportIntent> {
        self.intent
    }

    pub fn timer(&self) -> &PollTimer {
        &self.timer
    }

    /// Start a freshly loaded track: play and arm the timer.
    pub fn start_playing<E: MediaEngine>(&mut self, engine: &mut E, now: Instant) {
        engine.play();
        self.intent = Some(TransportIntent::Playing);
        self.timer.start(now);
    }

    /// Pause when the engine is playing, otherwise resume.
    pub fn toggle_play_pause<E: MediaEngine>(
        &mut self,
        engine: &mut E,
        now: Instant,
    ) -> TransportIntent {
        let intent = if engine.is_playing() {
            engine.pause();
            self.timer.stop();
            TransportIntent::Paused
        } else {
            engine.play();
            self.timer.start(now);
            TransportIntent::Playing
        };
        self.intent = Some(intent);
        intent
    }

    /// Forward a `0..=100` volume level unchanged.
    pub fn set_volume<E: MediaEngine>(&mut self, engine: &mut E, level: u8) {
        engine.set_volume(level);
    }

    /// Forward a seek unchanged; the engine clamps it.
    pub fn seek<E: MediaEngine>(&mut self, engine: &mut E, position_ms: u64) {
        engine.set_position(position_ms);
    }

    /// True when the polling timer says the time label is due for a refresh.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        self.timer.fire(now)
    }
}
