use std::time::{Duration, Instant};

/// Elapsed-time bookkeeping for the active track.
///
/// `base` holds the position reached before the current run started
/// (resume point, seek target, or time accumulated before a pause).
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct PlaybackTimer {
    started_at: Option<Instant>,
    base: Duration,
}

impl PlaybackTimer {
    pub fn start(&mut self, now: Instant, from: Duration) {
        self.base = from;
        self.started_at = Some(now);
    }

    pub fn pause(&mut self, now: Instant) -> Duration {
        self.base = self.elapsed(now);
        self.started_at = None;
        self.base
    }

    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Jump to `position`, keeping the running/paused state.
    pub fn rebase(&mut self, now: Instant, position: Duration) {
        self.base = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
        self.base.saturating_add(running)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
