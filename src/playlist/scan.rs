use std::path::Path;

use log::warn;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::PlaylistError;

use super::model::Track;

/// Case-sensitive suffix match on the file name, e.g. `song.mp3` but not `song.MP3`.
fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| {
            settings
                .suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && name.ends_with(suffix.as_str()))
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files directly inside `dir`.
///
/// The result keeps the order the filesystem enumerates entries in; nothing is
/// sorted. Subdirectories are not entered.
pub fn list_folder(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, PlaylistError> {
    let mut tracks: Vec<Track> = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .min_depth(1)
        .max_depth(1);

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // The folder itself could not be read.
            Err(source) if source.depth() == 0 => {
                return Err(PlaylistError::ReadDir {
                    dir: dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            continue;
        }
        if !settings.include_hidden && is_hidden(path) {
            continue;
        }
        if is_audio_file(path, settings) {
            tracks.push(Track::new(path));
        }
    }

    Ok(tracks)
}
