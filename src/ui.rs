//! UI rendering for the terminal user interface.
//!
//! Everything drawn here comes from `App` and its `View`; nothing is mutated.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackState};
use crate::config::ControlsSettings;
use crate::engine::MediaEngine;

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[o] open folder".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        "[j/k] up/down".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[enter] play selected".to_string(),
        format!("[H/L] scrub -/+{}s", controls.scrub_seconds),
        format!("[-/+] volume -/+{}", controls.volume_step),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// First row of the visible window that keeps `selected` centered when possible.
fn window_start(total: usize, height: usize, selected: usize) -> usize {
    if total <= height || height == 0 {
        return 0;
    }
    selected.saturating_sub(height / 2).min(total - height)
}

fn status_text<E: MediaEngine>(app: &App<E>) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(
        match app.playback_state() {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        }
        .to_string(),
    );
    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {}", dir.display()));
    }
    if let Some(msg) = &app.view.status {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

/// Render the entire UI into the provided `frame`.
pub fn draw<E: MediaEngine>(frame: &mut Frame, app: &App<E>, controls: &ControlsSettings) {
    let view = &app.view;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header: window title and the current track.
    let header = Paragraph::new(view.track_label.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.window_title))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Track list; only the visible window is turned into items.
    {
        let tracks = app.tracks();
        let total = tracks.len();
        let height = chunks[2].height.saturating_sub(2) as usize;
        let start = window_start(total, height, app.selected);
        let end = (start + height.max(1)).min(total);

        let items: Vec<ListItem> = tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                let marker = if app.current_index() == Some(start + offset) {
                    "♪ "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{}", track.title()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(app.selected.saturating_sub(start)));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Position and volume sliders side by side.
    let sliders = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[3]);

    let position = Gauge::default()
        .block(Block::bordered().title(" position "))
        .ratio(view.position_ratio())
        .label(view.time_label.as_str());
    frame.render_widget(position, sliders[0]);

    let volume = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .percent(u16::from(view.volume.min(100)))
        .label(format!("{}%", view.volume));
    frame.render_widget(volume, sliders[1]);

    let footer = Paragraph::new(controls_text(controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    // Folder prompt overlays the list.
    if let Some(prompt) = &app.prompt {
        let area = centered_rect_sized(chunks[2].width.saturating_sub(4), 3, chunks[2]);
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}█", prompt.input())).block(
            Block::bordered()
                .padding(LEFT_PAD)
                .title(" open folder (enter opens, esc cancels) "),
        );
        frame.render_widget(input, area);
    }
}
