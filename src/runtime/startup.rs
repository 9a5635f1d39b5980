use std::path::PathBuf;

use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioEngine;
use crate::config::PreferenceStore;
use crate::playback::Clock;
use crate::theme::Theme;

/// Saved preference first, then the configured default.
pub fn initial_theme(store: Option<&PreferenceStore>, configured_dark: bool) -> Theme {
    let saved = store.and_then(|s| match s.load() {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(error = %e, "ignoring saved preferences");
            None
        }
    });
    Theme::from_dark_mode(saved.map_or(configured_dark, |p| p.dark_mode))
}

/// Import every path given on the command line, in order.
pub fn import_cli_paths<E: AudioEngine, C: Clock>(app: &mut App<E, C>, paths: &[PathBuf]) {
    for path in paths {
        app.import_path(path);
    }
    if !paths.is_empty() {
        info!(paths = paths.len(), tracks = app.player.len(), "startup import done");
    }
}
