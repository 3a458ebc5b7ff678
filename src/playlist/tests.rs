use super::controller::wrap_index;
use super::*;
use crate::config::LibrarySettings;
use crate::error::PlaylistError;
use std::fs;
use std::path::PathBuf;

fn playlist(n: usize) -> PlaylistController {
    let mut p = PlaylistController::new();
    p.replace(
        (0..n)
            .map(|i| Track::new(format!("/music/{i}.mp3")))
            .collect(),
    );
    p
}

#[test]
fn track_title_is_the_file_name_with_extension() {
    let t = Track::new("/music/album/01 - Intro.mp3");
    assert_eq!(t.title(), "01 - Intro.mp3");
}

#[test]
fn wrap_index_is_true_modulo() {
    assert_eq!(wrap_index(2, 1, 3), 0);
    assert_eq!(wrap_index(0, -1, 3), 2);
    assert_eq!(wrap_index(0, -1, 1), 0);
    assert_eq!(wrap_index(1, -4, 3), 0);
}

#[test]
fn next_and_previous_are_noops_on_an_empty_playlist() {
    let mut p = PlaylistController::new();
    assert!(p.next().is_none());
    assert!(p.previous().is_none());
    assert_eq!(p.current_index(), None);
}

#[test]
fn next_applied_len_times_returns_to_start() {
    for n in 1..=6 {
        for start in 0..n {
            let mut p = playlist(n);
            p.select(start);
            for _ in 0..n {
                p.next();
            }
            assert_eq!(p.current_index(), Some(start), "n={n} start={start}");
            for _ in 0..n {
                p.previous();
            }
            assert_eq!(p.current_index(), Some(start), "n={n} start={start}");
        }
    }
}

#[test]
fn next_then_previous_is_identity() {
    for n in 1..=5 {
        for start in 0..n {
            let mut p = playlist(n);
            p.select(start);
            p.next();
            p.previous();
            assert_eq!(p.current_index(), Some(start));
            p.previous();
            p.next();
            assert_eq!(p.current_index(), Some(start));
        }
    }
}

#[test]
fn next_from_last_wraps_to_first() {
    let mut p = playlist(3);
    p.select(2);
    let t = p.next().cloned().unwrap();
    assert_eq!(p.current_index(), Some(0));
    assert_eq!(t.path, PathBuf::from("/music/0.mp3"));
}

#[test]
fn previous_from_first_wraps_to_last() {
    let mut p = playlist(3);
    let t = p.previous().cloned().unwrap();
    assert_eq!(p.current_index(), Some(2));
    assert_eq!(t.path, PathBuf::from("/music/2.mp3"));
}

#[test]
fn select_ignores_out_of_range() {
    let mut p = playlist(2);
    p.select(1);
    p.select(9);
    assert_eq!(p.current_index(), Some(1));
}

#[test]
fn load_folder_replaces_playlist_and_resets_index() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.mp3"), b"x").unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();

    let mut p = playlist(5);
    p.select(4);
    let n = p.load_folder(dir.path(), &LibrarySettings::default()).unwrap();
    assert_eq!(n, 2);
    assert_eq!(p.len(), 2);
    assert_eq!(p.current_index(), Some(0));
    assert!(p.tracks().iter().all(|t| t.path.starts_with(dir.path())));
}

#[test]
fn load_folder_without_matches_empties_playlist() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
    fs::write(dir.path().join("LOUD.MP3"), b"x").unwrap();

    let mut p = playlist(3);
    let err = p
        .load_folder(dir.path(), &LibrarySettings::default())
        .unwrap_err();
    assert!(matches!(err, PlaylistError::EmptyFolder { .. }));
    assert!(p.is_empty());
    assert_eq!(p.current_index(), None);
    assert!(p.current().is_none());
}
