//! The `App` context object: controller, selection, theme and input state.
//!
//! Nothing here is global. The runtime owns one `App` and hands it to the
//! renderer and the key handlers by reference.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audio::AudioEngine;
use crate::config::{ControlsSettings, LibrarySettings, PreferenceStore, Preferences};
use crate::library;
use crate::playback::{Clock, Controller, ImportReport, SystemClock, Track};
use crate::theme::Theme;

use super::action::Action;

/// What the keyboard is currently feeding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a path to import.
    Import(String),
}

pub struct App<E: AudioEngine, C: Clock = SystemClock> {
    pub player: Controller<E, C>,
    pub selected: usize,
    pub theme: Theme,
    pub input: InputMode,
    /// Last message shown in the status line.
    pub status: Option<String>,
    library: LibrarySettings,
    controls: ControlsSettings,
    preferences: Option<PreferenceStore>,
}

impl<E: AudioEngine, C: Clock> App<E, C> {
    pub fn new(
        player: Controller<E, C>,
        library: LibrarySettings,
        controls: ControlsSettings,
        theme: Theme,
    ) -> Self {
        Self {
            player,
            selected: 0,
            theme,
            input: InputMode::Normal,
            status: None,
            library,
            controls,
            preferences: None,
        }
    }

    /// Persist theme changes through `store`.
    pub fn with_preferences(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    pub fn controls(&self) -> &ControlsSettings {
        &self.controls
    }

    pub fn selected_track(&self) -> Option<&Track<E::Handle>> {
        self.player.tracks().get(self.selected)
    }

    pub fn selected_key(&self) -> Option<PathBuf> {
        self.selected_track().map(|t| t.path().to_path_buf())
    }

    /// Move selection to the next card, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.player.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous card, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.player.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Move selection onto `key`. Unknown keys leave it where it is.
    pub fn select(&mut self, key: &Path) {
        if let Some(index) = self.player.tracks().iter().position(|t| t.path() == key) {
            self.selected = index;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.player.len().saturating_sub(1));
    }

    /// Apply `action`. Returns `true` when the app should quit.
    pub fn dispatch(&mut self, action: Action) -> bool {
        if let Some(key) = action.key() {
            if self.player.track(key).is_none() {
                debug!(path = %key.display(), ?action, "action for unknown track ignored");
                return false;
            }
        }

        match action {
            Action::TogglePlay(key) => self.player.request_play(&key),
            Action::SeekBy(key, delta) => self.player.seek_by(&key, delta),
            Action::SeekTo(key, secs) => self.player.seek(&key, secs),
            Action::BeginDrag(key) => self.player.begin_drag(&key),
            Action::DragTo(key, secs) => self.player.drag_to(&key, secs),
            Action::EndDrag(key) => self.player.end_drag(&key),
            Action::AdjustVolume(key, delta) => self.player.adjust_volume(&key, delta),
            Action::Remove(key) => {
                if self.player.remove(&key) {
                    self.clamp_selection();
                    self.status = Some(format!("Removed {}", file_label(&key)));
                }
            }
            Action::ClearAll => {
                self.player.clear_all();
                self.selected = 0;
                self.status = Some("Playlist cleared".to_string());
            }
            Action::Import(path) => self.import_path(&path),
            Action::ToggleTheme => self.toggle_theme(),
            Action::Quit => return true,
        }
        false
    }

    /// Expand `path` into candidates and append them to the playlist.
    pub fn import_path(&mut self, path: &Path) {
        let candidates = match library::collect(path, &self.library) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import rejected");
                self.status = Some(e.to_string());
                return;
            }
        };

        if self.library.replace_on_import {
            self.player.clear_all();
            self.selected = 0;
        }

        let report = self.player.import(candidates);
        self.status = Some(import_message(path, &report));
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        info!(dark = self.theme.is_dark(), "theme toggled");

        let Some(store) = &self.preferences else {
            return;
        };
        let prefs = Preferences {
            dark_mode: self.theme.is_dark(),
        };
        if let Err(e) = store.save(&prefs) {
            warn!(error = %e, "cannot save preferences");
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.input, InputMode::Import(_))
    }

    pub fn begin_import(&mut self) {
        self.input = InputMode::Import(String::new());
    }

    pub fn push_input(&mut self, c: char) {
        if let InputMode::Import(buf) = &mut self.input {
            buf.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        if let InputMode::Import(buf) = &mut self.input {
            buf.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = InputMode::Normal;
    }

    /// Leave the prompt and turn its text into an import, unless blank.
    pub fn submit_input(&mut self) -> Option<Action> {
        let InputMode::Import(buf) = std::mem::take(&mut self.input) else {
            return None;
        };
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Action::Import(expand_home(trimmed)))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn import_message(path: &Path, report: &ImportReport) -> String {
    let mut msg = format!(
        "Imported {} track{} from {}",
        report.added,
        if report.added == 1 { "" } else { "s" },
        file_label(path)
    );
    if report.duplicates > 0 {
        msg.push_str(&format!(", {} already listed", report.duplicates));
    }
    if report.failed > 0 {
        msg.push_str(&format!(", {} unplayable", report.failed));
    }
    msg
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(input)
}
