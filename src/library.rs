//! Turning user-supplied paths into import candidates.
//!
//! A candidate carries the file path plus whatever the tag reader could find;
//! loading the audio itself is left to the playback controller.

mod display;
mod model;
mod scan;

pub use model::TrackInfo;
pub use scan::{CollectError, collect, is_audio_file, read_track_info};
