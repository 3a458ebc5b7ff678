//! In-memory `MediaEngine` used by controller tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::types::{EngineEvent, LoadId, MediaEngine};

/// Every command the controller issued, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    SetVolume(u8),
    SetPosition(u64),
}

#[derive(Debug, Default)]
pub struct MockEngine {
    pub calls: Vec<Call>,
    pub playing: bool,
    pub position_ms: u64,
    pub loaded: Option<PathBuf>,
    pub queued: VecDeque<EngineEvent>,
    next_load: LoadId,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id handed out by the most recent `load`.
    pub fn last_load(&self) -> LoadId {
        self.next_load
    }

    pub fn push_event(&mut self, event: EngineEvent) {
        self.queued.push_back(event);
    }

    pub fn loads(&self) -> Vec<PathBuf> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Load(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl MediaEngine for MockEngine {
    fn load(&mut self, path: &Path) -> LoadId {
        self.next_load += 1;
        self.calls.push(Call::Load(path.to_path_buf()));
        self.loaded = Some(path.to_path_buf());
        self.playing = false;
        self.position_ms = 0;
        self.next_load
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        if self.loaded.is_some() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_volume(&mut self, level: u8) {
        self.calls.push(Call::SetVolume(level));
    }

    fn set_position(&mut self, position_ms: u64) {
        self.calls.push(Call::SetPosition(position_ms));
        self.position_ms = position_ms;
    }

    fn position(&self) -> u64 {
        self.position_ms
    }

    fn try_next_event(&mut self) -> Option<EngineEvent> {
        self.queued.pop_front()
    }
}
