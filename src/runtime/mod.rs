use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::engine::RodioEngine;
use crate::mpris::{ControlCmd, spawn_mpris};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(path) => info!("logging to {}", path.display()),
        Err(e) => eprintln!("cadence: logging disabled: {e}"),
    }
    if let Some(msg) = settings_warning {
        eprintln!("cadence: {msg}");
        warn!("{msg}");
    }

    let engine = RodioEngine::new(&settings.audio)?;
    let mut app = App::new(engine, &settings);

    let initial_dir = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.library.default_dir.clone());
    match initial_dir {
        // Failures land on the status line; the player still starts.
        Some(dir) => {
            let _ = app.open_folder(&dir, Instant::now());
        }
        None => app.view.status = Some("press o to open a folder".to_string()),
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .mpris
        .enabled
        .then(|| spawn_mpris(control_tx.clone()));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        mpris.as_ref(),
        &control_tx,
        &control_rx,
        &mut state,
    );

    app.engine()
        .shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("bye");
    run_result
}
