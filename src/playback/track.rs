use std::path::Path;
use std::time::Duration;

use crate::library::TrackInfo;

/// Furthest seek target for a track whose length is not known.
pub(super) const UNKNOWN_DURATION_CAP: Duration = Duration::from_secs(24 * 60 * 60);

/// Transport state of a single track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// One imported file together with its audio handle and transport state.
///
/// A track without a handle failed to load: it stays listed, flagged with
/// its error, and can never start.
#[derive(Debug)]
pub struct Track<H> {
    pub(super) info: TrackInfo,
    pub(super) duration: Option<Duration>,
    pub(super) state: PlaybackState,
    pub(super) position: Duration,
    pub(super) volume: f32,
    pub(super) handle: Option<H>,
    pub(super) error: Option<String>,
}

impl<H> Track<H> {
    pub(super) fn loaded(
        info: TrackInfo,
        handle: H,
        duration: Option<Duration>,
        volume: f32,
    ) -> Self {
        // Prefer what the decoder measured; tags are only a fallback.
        let duration = duration.or(info.duration).filter(|d| !d.is_zero());
        Self {
            info,
            duration,
            state: PlaybackState::Stopped,
            position: Duration::ZERO,
            volume,
            handle: Some(handle),
            error: None,
        }
    }

    pub(super) fn unplayable(info: TrackInfo, error: String, volume: f32) -> Self {
        Self {
            duration: info.duration.filter(|d| !d.is_zero()),
            info,
            state: PlaybackState::Stopped,
            position: Duration::ZERO,
            volume,
            handle: None,
            error: Some(error),
        }
    }

    pub fn path(&self) -> &Path {
        &self.info.path
    }

    pub fn display(&self) -> &str {
        &self.info.display
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playable(&self) -> bool {
        self.handle.is_some()
    }

    /// Why the track cannot be played, if it cannot.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Position as a fraction of the duration, for the seek bar.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Clamp a requested position in seconds to `[0, duration]`.
    ///
    /// NaN and negative values map to zero. With an unknown duration the
    /// target is capped at `UNKNOWN_DURATION_CAP`; the decoder draining
    /// ends the track if that lies past its real end.
    pub fn clamp_position(&self, secs: f64) -> Duration {
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        let wanted = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        match self.duration {
            Some(total) => wanted.min(total),
            None => wanted.min(UNKNOWN_DURATION_CAP),
        }
    }

    pub(super) fn reset(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = Duration::ZERO;
    }
}
