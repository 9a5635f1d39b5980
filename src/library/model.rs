use std::path::PathBuf;
use std::time::Duration;

/// Everything known about a file before its audio is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Length according to the file's tags/properties.
    pub duration: Option<Duration>,
    pub display: String,
}

impl TrackInfo {
    /// Candidate with no metadata: the display name is the filename stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            display: title.clone(),
            path,
            title,
            artist: None,
            album: None,
            duration: None,
        }
    }
}
