use crate::app::{App, PlaybackState};
use crate::engine::{LoadId, MediaEngine};
use crate::mpris::MprisHandle;

/// What MPRIS last saw; the bus is only touched when this changes.
pub type MprisSnapshot = (PlaybackState, Option<LoadId>, u8);

pub fn snapshot<E: MediaEngine>(app: &App<E>) -> MprisSnapshot {
    (app.playback_state(), app.current_load(), app.view.volume)
}

pub fn update_mpris<E: MediaEngine>(mpris: &MprisHandle, app: &App<E>) {
    match app.current_index().and_then(|i| app.tracks().get(i)) {
        Some(track) => mpris.set_track(Some((track.title().as_ref(), track.path.as_path()))),
        None => mpris.set_track(None),
    }
    mpris.set_playback(app.playback_state());
    mpris.set_volume(app.view.volume);
}
