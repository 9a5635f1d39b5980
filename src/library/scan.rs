use std::path::{Path, PathBuf};

use lofty::prelude::*;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::TrackInfo;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a supported audio file", .0.display())]
    Unsupported(PathBuf),
}

/// Extension check against `settings.extensions` (case-insensitive, dot optional).
pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read tags for `path`. Unreadable tags fall back to the filename.
pub fn read_track_info(path: &Path, settings: &LibrarySettings) -> TrackInfo {
    let mut info = TrackInfo::from_path(path);

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            info.duration = (!duration.is_zero()).then_some(duration);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = tag.title().filter(|v| !v.trim().is_empty()) {
                    info.title = title.trim().to_string();
                }
                info.artist = tag
                    .artist()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                info.album = tag
                    .album()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags, using filename"),
    }

    info.display = display_from_fields(
        path,
        &info.title,
        info.artist.as_deref(),
        info.album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );
    info
}

/// Expand a user-supplied file or folder into import candidates.
///
/// A single file must pass the extension check. A folder is walked according
/// to `settings` and its audio files are returned sorted by display name.
pub fn collect(target: &Path, settings: &LibrarySettings) -> Result<Vec<TrackInfo>, CollectError> {
    if !target.exists() {
        return Err(CollectError::NotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        if !is_audio_file(target, settings) {
            return Err(CollectError::Unsupported(target.to_path_buf()));
        }
        return Ok(vec![read_track_info(target, settings)]);
    }

    let mut walker = WalkDir::new(target).follow_links(settings.follow_links);

    // Non-recursive = only the folder itself.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<TrackInfo> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() || e.path().is_file())
        .filter(|e| is_audio_file(e.path(), settings))
        .map(|e| read_track_info(e.path(), settings))
        .collect();

    tracks.sort_by_key(|t| t.display.to_lowercase());
    info!(folder = %target.display(), found = tracks.len(), "scanned folder");
    Ok(tracks)
}
