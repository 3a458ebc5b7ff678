use crate::config::UiSettings;
use crate::time_display::format_position;

/// Everything the UI shell displays, kept up to date by `App`.
#[derive(Debug, Clone)]
pub struct View {
    pub window_title: String,
    /// Basename of the current track, or the "nothing selected" text.
    pub track_label: String,
    /// `mm:ss / mm:ss`.
    pub time_label: String,
    /// Position slider range is `0..=position_max` (last known duration, ms).
    pub position_max: u64,
    pub position_value: u64,
    pub volume: u8,
    /// Last soft error or notice, shown in the status line.
    pub status: Option<String>,
}

impl View {
    pub fn new(ui: &UiSettings, volume: u8) -> Self {
        Self {
            window_title: ui.window_title.clone(),
            track_label: ui.empty_track_label.clone(),
            time_label: format_position(0, 0),
            position_max: 0,
            position_value: 0,
            volume: volume.min(100),
            status: None,
        }
    }

    /// Slider fill in `0.0..=1.0`.
    pub fn position_ratio(&self) -> f64 {
        if self.position_max == 0 {
            return 0.0;
        }
        self.position_value.min(self.position_max) as f64 / self.position_max as f64
    }
}
