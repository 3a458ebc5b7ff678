use super::*;
use std::sync::mpsc;

fn player() -> (Player, MprisHandle, mpsc::Receiver<ControlCmd>) {
    let handle = MprisHandle::new();
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = Player {
        remote: Remote { tx },
        snapshot: handle.snapshot.clone(),
    };
    (iface, handle, rx)
}

fn text(meta: &mut HashMap<String, OwnedValue>, key: &str) -> Option<String> {
    meta.remove(key).map(|v| String::try_from(v).unwrap())
}

#[test]
fn playback_status_follows_the_handle() {
    let (iface, handle, _rx) = player();
    assert_eq!(iface.playback_status(), "Stopped");

    handle.set_playback(PlaybackState::Playing);
    assert_eq!(iface.playback_status(), "Playing");

    handle.set_playback(PlaybackState::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_carries_title_and_url() {
    let (iface, handle, _rx) = player();
    handle.set_track(Some(("01 - Intro.mp3", Path::new("/music/01 - Intro.mp3"))));

    let mut meta = iface.metadata();
    assert_eq!(text(&mut meta, "xesam:title").as_deref(), Some("01 - Intro.mp3"));
    assert_eq!(
        text(&mut meta, "xesam:url").as_deref(),
        Some("file:///music/01 - Intro.mp3")
    );

    handle.set_track(None);
    let mut meta = iface.metadata();
    assert_eq!(text(&mut meta, "xesam:title").as_deref(), Some(""));
    assert_eq!(text(&mut meta, "xesam:url"), None);
}

#[test]
fn volume_is_reported_as_a_fraction() {
    let (iface, handle, _rx) = player();
    handle.set_volume(50);
    assert_eq!(iface.volume(), 0.5);
    handle.set_volume(200);
    assert_eq!(iface.volume(), 1.0);
}

#[test]
fn stop_is_forwarded_as_pause() {
    let (iface, _handle, rx) = player();
    iface.stop();
    iface.next();
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Pause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Next);
}
