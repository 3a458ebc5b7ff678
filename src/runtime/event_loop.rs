use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackState};
use crate::config;
use crate::engine::MediaEngine;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, snapshot, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last state published to MPRIS.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Main terminal event loop: drains engine notifications, drives the refresh
/// timer, draws, and dispatches keys and MPRIS requests. Returns when a quit
/// is requested.
pub fn run<E: MediaEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<E>,
    mpris: Option<&MprisHandle>,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        app.pump_engine_events(now);
        app.tick(now);

        if let Some(mpris) = mpris {
            let current = snapshot(app);
            if state.last_mpris != Some(current) {
                update_mpris(mpris, app);
                state.last_mpris = Some(current);
            }
        }

        terminal.draw(|f| ui::draw(f, app, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, Instant::now()) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, control_tx, state, Instant::now()) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply a transport request from MPRIS or a key binding. Returns true on quit.
pub fn handle_control_cmd<E: MediaEngine>(cmd: ControlCmd, app: &mut App<E>, now: Instant) -> bool {
    debug!("control: {cmd:?}");
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match app.playback_state() {
            PlaybackState::Playing => {}
            _ if app.current_load().is_none() => app.play_selected(now),
            _ => {
                app.play_pause(now);
            }
        },
        ControlCmd::Pause => {
            if app.playback_state() == PlaybackState::Playing {
                app.play_pause(now);
            }
        }
        // An emptied playlist does not unload the engine; keep toggling it.
        ControlCmd::PlayPause => {
            if app.current_load().is_none() {
                app.play_selected(now);
            } else {
                app.play_pause(now);
            }
        }
        ControlCmd::Next => app.next_track(now),
        ControlCmd::Prev => app.previous_track(now),
    }
    false
}

/// Handle one key press. Returns true when the user asked to quit.
pub fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<E>,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    if app.prompt.is_some() {
        state.pending_gg = false;
        handle_prompt_key(key, app, now);
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let step = i16::from(settings.controls.volume_step);
    let scrub_ms = settings
        .controls
        .scrub_seconds
        .saturating_mul(1000)
        .min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('o') => app.open_prompt(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.cursor_to_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.cursor_to_last(),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Enter => app.play_selected(now),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => app.scrub(scrub_ms),
        KeyCode::Char('H') => app.scrub(-scrub_ms),
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge_volume(step),
        KeyCode::Char('-') => app.nudge_volume(-step),
        _ => {}
    }

    false
}

fn handle_prompt_key<E: MediaEngine>(key: KeyEvent, app: &mut App<E>, now: Instant) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => {
            // Failures are already on the status line.
            let _ = app.submit_prompt(now);
        }
        KeyCode::Backspace => {
            if let Some(p) = app.prompt.as_mut() {
                p.pop();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(p) = app.prompt.as_mut() {
                p.clear();
            }
        }
        KeyCode::Char(c) if !c.is_control() => {
            if let Some(p) = app.prompt.as_mut() {
                p.push(c);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::engine::mock::{Call, MockEngine};
    use crate::playlist::Track;
    use std::fs;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    struct Harness {
        settings: Settings,
        app: App<MockEngine>,
        tx: mpsc::Sender<ControlCmd>,
        rx: mpsc::Receiver<ControlCmd>,
        state: EventLoopState,
        now: Instant,
    }

    impl Harness {
        fn new(tracks: usize) -> Self {
            let settings = Settings::default();
            let mut app = App::new(MockEngine::new(), &settings);
            let now = Instant::now();
            app.load_tracks(
                (0..tracks)
                    .map(|i| Track::new(format!("/music/{i}.mp3")))
                    .collect(),
                now,
            );
            let (tx, rx) = mpsc::channel();
            Self {
                settings,
                app,
                tx,
                rx,
                state: EventLoopState::default(),
                now,
            }
        }

        /// Press a key and run any control commands it queued.
        fn press(&mut self, key: KeyEvent) -> bool {
            let mut quit = handle_key_event(
                key,
                &self.settings,
                &mut self.app,
                &self.tx,
                &mut self.state,
                self.now,
            );
            while let Ok(cmd) = self.rx.try_recv() {
                quit |= handle_control_cmd(cmd, &mut self.app, self.now);
            }
            quit
        }
    }

    #[test]
    fn transport_keys_go_through_control_commands() {
        let mut h = Harness::new(3);
        h.press(key('l'));
        assert_eq!(h.app.current_index(), Some(1));
        h.press(key('h'));
        h.press(key('h'));
        assert_eq!(h.app.current_index(), Some(2));

        h.press(key(' '));
        assert_eq!(h.app.playback_state(), PlaybackState::Paused);
        h.press(key('p'));
        assert_eq!(h.app.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn cursor_keys_and_gg_move_the_selection() {
        let mut h = Harness::new(4);
        h.press(key('j'));
        h.press(key('j'));
        assert_eq!(h.app.selected, 2);
        h.press(key('G'));
        assert_eq!(h.app.selected, 3);

        h.press(key('g'));
        assert_eq!(h.app.selected, 3);
        h.press(key('g'));
        assert_eq!(h.app.selected, 0);

        // A lone `g` is forgotten by the next key.
        h.press(key('g'));
        h.press(key('j'));
        h.press(key('g'));
        assert_eq!(h.app.selected, 1);

        h.press(key('k'));
        h.press(key('k'));
        assert_eq!(h.app.selected, 3);
        h.press(code(KeyCode::Enter));
        assert_eq!(h.app.current_index(), Some(3));
    }

    #[test]
    fn volume_keys_step_and_clamp() {
        let mut h = Harness::new(1);
        h.press(key('+'));
        assert_eq!(h.app.view.volume, 55);
        for _ in 0..20 {
            h.press(key('-'));
        }
        assert_eq!(h.app.view.volume, 0);
        assert_eq!(h.app.engine().calls.last(), Some(&Call::SetVolume(0)));
    }

    #[test]
    fn scrub_keys_seek_within_the_known_duration() {
        let mut h = Harness::new(1);
        h.app.view.position_max = 7_000;
        h.press(key('L'));
        assert_eq!(h.app.engine().calls.last(), Some(&Call::SetPosition(5_000)));
        h.press(key('L'));
        assert_eq!(h.app.engine().calls.last(), Some(&Call::SetPosition(7_000)));
        h.press(key('H'));
        h.press(key('H'));
        assert_eq!(h.app.engine().calls.last(), Some(&Call::SetPosition(0)));
    }

    #[test]
    fn prompt_captures_keys_until_submitted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("song.mp3"), b"x").unwrap();

        let mut h = Harness::new(2);
        h.press(key('o'));
        assert!(h.app.prompt.is_some());

        h.press(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        for c in dir.path().display().to_string().chars() {
            h.press(key(c));
        }
        // `q` is text inside the prompt, not quit.
        assert!(!h.press(key('q')));
        h.press(code(KeyCode::Backspace));
        h.press(code(KeyCode::Enter));

        assert!(h.app.prompt.is_none());
        assert_eq!(h.app.tracks().len(), 1);
        assert_eq!(h.app.view.track_label, "song.mp3");
    }

    #[test]
    fn escape_cancels_the_prompt() {
        let mut h = Harness::new(2);
        let before = h.app.engine().calls.clone();
        h.press(key('o'));
        h.press(code(KeyCode::Esc));
        assert!(h.app.prompt.is_none());
        assert_eq!(h.app.tracks().len(), 2);
        assert_eq!(h.app.engine().calls, before);
    }

    #[test]
    fn quit_comes_from_keys_and_mpris() {
        let mut h = Harness::new(1);
        assert!(h.press(key('q')));
        assert!(handle_control_cmd(ControlCmd::Quit, &mut h.app, h.now));
    }

    #[test]
    fn mpris_play_and_pause_only_act_on_a_state_change() {
        let mut h = Harness::new(1);
        let plays = h.app.engine().count(&Call::Play);
        handle_control_cmd(ControlCmd::Play, &mut h.app, h.now);
        assert_eq!(h.app.engine().count(&Call::Play), plays);

        handle_control_cmd(ControlCmd::Pause, &mut h.app, h.now);
        handle_control_cmd(ControlCmd::Pause, &mut h.app, h.now);
        assert_eq!(h.app.engine().count(&Call::Pause), 1);

        handle_control_cmd(ControlCmd::Play, &mut h.app, h.now);
        assert_eq!(h.app.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn play_pause_still_reaches_the_engine_after_an_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let mut h = Harness::new(2);
        assert!(h.app.open_folder(dir.path(), h.now).is_err());
        assert!(h.app.tracks().is_empty());
        assert!(h.app.engine().is_playing());

        h.press(key(' '));
        assert!(!h.app.engine().is_playing());
        assert_eq!(h.app.engine().count(&Call::Pause), 1);

        h.press(key('p'));
        assert!(h.app.engine().is_playing());

        handle_control_cmd(ControlCmd::Pause, &mut h.app, h.now);
        assert_eq!(h.app.playback_state(), PlaybackState::Paused);
        handle_control_cmd(ControlCmd::Play, &mut h.app, h.now);
        assert_eq!(h.app.playback_state(), PlaybackState::Playing);
        assert_eq!(h.app.engine().loads().len(), 1);
    }

    #[test]
    fn play_with_nothing_loaded_starts_the_selection() {
        let settings = Settings::default();
        let mut app = App::new(MockEngine::new(), &settings);
        let now = Instant::now();
        handle_control_cmd(ControlCmd::PlayPause, &mut app, now);
        assert_eq!(app.engine().loads(), Vec::<std::path::PathBuf>::new());
    }
}
