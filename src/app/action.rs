use std::path::{Path, PathBuf};

/// Every user-triggered operation, keyed by the track it targets.
///
/// Keys are resolved when the action is dispatched, so an action built for a
/// track that has since been removed simply does nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    TogglePlay(PathBuf),
    /// Relative seek in seconds.
    SeekBy(PathBuf, f64),
    /// Absolute seek in seconds.
    SeekTo(PathBuf, f64),
    BeginDrag(PathBuf),
    DragTo(PathBuf, f64),
    EndDrag(PathBuf),
    AdjustVolume(PathBuf, f32),
    Remove(PathBuf),
    ClearAll,
    /// A file or folder to expand and append.
    Import(PathBuf),
    ToggleTheme,
    Quit,
}

impl Action {
    /// The track this action targets, if any.
    pub fn key(&self) -> Option<&Path> {
        match self {
            Self::TogglePlay(k)
            | Self::SeekBy(k, _)
            | Self::SeekTo(k, _)
            | Self::BeginDrag(k)
            | Self::DragTo(k, _)
            | Self::EndDrag(k)
            | Self::AdjustVolume(k, _)
            | Self::Remove(k) => Some(k),
            Self::ClearAll | Self::Import(_) | Self::ToggleTheme | Self::Quit => None,
        }
    }
}
