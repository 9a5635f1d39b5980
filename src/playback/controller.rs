use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, AudioError};
use crate::library::TrackInfo;

use super::clock::{Clock, SystemClock};
use super::playlist::Playlist;
use super::timer::PlaybackTimer;
use super::track::{PlaybackState, Track};

/// Counts from one import batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// New tracks that loaded and can be played.
    pub added: usize,
    /// Paths already in the playlist; skipped.
    pub duplicates: usize,
    /// New tracks kept in the playlist but flagged unplayable.
    pub failed: usize,
}

/// What a polling tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing is playing.
    Idle,
    /// The active track moved to `position`.
    Progress { position: Duration },
    /// `from` completed and `to` started.
    Advanced { from: PathBuf, to: PathBuf },
    /// `last` completed and nothing follows it.
    Finished { last: PathBuf },
}

#[derive(Debug)]
struct Drag {
    key: PathBuf,
    resume: bool,
}

/// Owns the playlist and coordinates transport across all tracks.
///
/// At most one track is ever `Playing` or `Paused`: the active one. Every
/// operation takes the track's path as its key; unknown keys are ignored.
pub struct Controller<E: AudioEngine, C: Clock = SystemClock> {
    engine: E,
    clock: C,
    playlist: Playlist<E::Handle>,
    active: Option<PathBuf>,
    timer: PlaybackTimer,
    polling: bool,
    drag: Option<Drag>,
    default_volume: f32,
}

impl<E: AudioEngine> Controller<E, SystemClock> {
    pub fn new(engine: E, default_volume: f32) -> Self {
        Self::with_clock(engine, SystemClock, default_volume)
    }
}

impl<E: AudioEngine, C: Clock> Controller<E, C> {
    pub fn with_clock(engine: E, clock: C, default_volume: f32) -> Self {
        Self {
            engine,
            clock,
            playlist: Playlist::default(),
            active: None,
            timer: PlaybackTimer::default(),
            polling: false,
            drag: None,
            default_volume: clamp_volume(default_volume),
        }
    }

    pub fn tracks(&self) -> &[Track<E::Handle>] {
        self.playlist.as_slice()
    }

    pub fn track(&self, key: &Path) -> Option<&Track<E::Handle>> {
        self.playlist.find(key)
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn active(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    pub fn active_track(&self) -> Option<&Track<E::Handle>> {
        self.active.as_deref().and_then(|k| self.playlist.find(k))
    }

    pub fn state_of(&self, key: &Path) -> Option<PlaybackState> {
        self.track(key).map(Track::state)
    }

    pub fn position_of(&self, key: &Path) -> Option<Duration> {
        self.track(key).map(Track::position)
    }

    /// True while the polling loop has work to do.
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn is_dragging(&self, key: &Path) -> bool {
        self.drag.as_ref().is_some_and(|d| d.key == key)
    }

    fn is_active(&self, key: &Path) -> bool {
        self.active.as_deref() == Some(key)
    }

    /// Append candidates in order. Duplicates are skipped; files that fail
    /// to load are kept but flagged unplayable.
    pub fn import<I>(&mut self, candidates: I) -> ImportReport
    where
        I: IntoIterator<Item = TrackInfo>,
    {
        let mut report = ImportReport::default();

        for info in candidates {
            if self.playlist.contains(&info.path) {
                warn!(path = %info.path.display(), "already in playlist, skipping");
                report.duplicates += 1;
                continue;
            }

            let track = match self.engine.load(&info.path) {
                Ok(asset) => {
                    let mut handle = asset.handle;
                    self.engine.set_volume(&mut handle, self.default_volume);
                    report.added += 1;
                    Track::loaded(info, handle, asset.duration, self.default_volume)
                }
                Err(e) => {
                    warn!(path = %info.path.display(), error = %e, "cannot load track");
                    report.failed += 1;
                    Track::unplayable(info, e.to_string(), self.default_volume)
                }
            };

            if let Err(track) = self.playlist.push(track) {
                if let Some(handle) = track.handle {
                    self.engine.release(handle);
                }
            }
        }

        info!(
            added = report.added,
            duplicates = report.duplicates,
            failed = report.failed,
            total = self.playlist.len(),
            "import finished"
        );
        report
    }

    /// Play, pause or resume `key`.
    ///
    /// Re-requesting the active track toggles pause. Any other track stops
    /// the active one first and then starts from its own position.
    pub fn request_play(&mut self, key: &Path) {
        let Some(index) = self.playlist.position(key) else {
            debug!(path = %key.display(), "play request for unknown track ignored");
            return;
        };
        let Some(track) = self.playlist.get(index) else {
            return;
        };
        if !track.is_playable() {
            warn!(path = %key.display(), "track is unplayable");
            return;
        }

        if self.is_active(key) {
            self.drag = None;
            match track.state() {
                PlaybackState::Paused => return self.resume_active(),
                PlaybackState::Playing => return self.pause_active(),
                PlaybackState::Stopped => {}
            }
        } else {
            self.stop_active();
        }

        self.start(index);
    }

    /// Move the active track to `target_secs`, clamped to `[0, duration]`.
    ///
    /// Audio restarts from the new offset; a paused track stays paused there.
    pub fn seek(&mut self, key: &Path, target_secs: f64) {
        if !self.is_active(key) {
            debug!(path = %key.display(), "seek on inactive track ignored");
            return;
        }
        let Some(index) = self.playlist.position(key) else {
            return;
        };
        let Some(target) = self.playlist.get(index).map(|t| t.clamp_position(target_secs)) else {
            return;
        };
        self.seek_to(index, target);
    }

    pub fn seek_by(&mut self, key: &Path, delta_secs: f64) {
        if let Some(position) = self.position_of(key) {
            self.seek(key, position.as_secs_f64() + delta_secs);
        }
    }

    /// Start dragging the seek bar of the active track.
    ///
    /// Audio and polling pause until [`Controller::end_drag`].
    pub fn begin_drag(&mut self, key: &Path) {
        if !self.is_active(key) || self.drag.is_some() {
            return;
        }
        let resume = self.state_of(key) == Some(PlaybackState::Playing);
        if resume {
            self.pause_active();
        }
        self.drag = Some(Drag {
            key: key.to_path_buf(),
            resume,
        });
    }

    /// Move the displayed position while dragging. Audio is untouched.
    pub fn drag_to(&mut self, key: &Path, secs: f64) {
        if !self.is_dragging(key) {
            return;
        }
        if let Some(track) = self.playlist.find_mut(key) {
            track.position = track.clamp_position(secs);
        }
    }

    /// Finish a drag: seek to the dragged position and resume if the track
    /// was playing when the drag began.
    pub fn end_drag(&mut self, key: &Path) {
        if !self.is_dragging(key) {
            return;
        }
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(index) = self.playlist.position(key) else {
            return;
        };
        let Some(target) = self.playlist.get(index).map(Track::position) else {
            return;
        };

        self.seek_to(index, target);
        if drag.resume && self.state_of(key) == Some(PlaybackState::Paused) {
            self.resume_active();
        }
    }

    pub fn set_volume(&mut self, key: &Path, volume: f32) {
        let Some(track) = self.playlist.find_mut(key) else {
            return;
        };
        track.volume = clamp_volume(volume);
        if let Some(handle) = track.handle.as_mut() {
            self.engine.set_volume(handle, track.volume);
        }
    }

    pub fn adjust_volume(&mut self, key: &Path, delta: f32) {
        if let Some(volume) = self.track(key).map(Track::volume) {
            self.set_volume(key, volume + delta);
        }
    }

    /// Remove `key`, stopping it first if it is active. Other tracks keep
    /// their state. Returns whether anything was removed.
    pub fn remove(&mut self, key: &Path) -> bool {
        let Some(index) = self.playlist.position(key) else {
            debug!(path = %key.display(), "remove of unknown track ignored");
            return false;
        };
        if self.is_active(key) {
            self.stop_active();
        }

        let Some(mut track) = self.playlist.remove(index) else {
            return false;
        };
        if let Some(handle) = track.handle.take() {
            self.engine.release(handle);
        }
        info!(track = %track.display(), "removed track");
        true
    }

    /// Stop everything and empty the playlist.
    pub fn clear_all(&mut self) {
        self.stop_active();
        let mut released = 0;
        for mut track in self.playlist.drain() {
            if let Some(handle) = track.handle.take() {
                self.engine.release(handle);
                released += 1;
            }
        }
        self.polling = false;
        self.drag = None;
        info!(released, "cleared playlist");
    }

    /// Fade the active track out, then clear everything.
    pub fn shutdown(&mut self, fade: Duration) {
        if let Some(key) = self.active.clone() {
            if let Some(handle) = self.playlist.find_mut(&key).and_then(|t| t.handle.as_mut()) {
                self.engine.fade_out(handle, fade);
            }
        }
        self.clear_all();
    }

    /// One polling tick: refresh the active track's position and
    /// auto-advance when it completes.
    pub fn poll(&mut self) -> PollOutcome {
        if !self.polling || self.drag.is_some() {
            return PollOutcome::Idle;
        }
        let Some(index) = self.active.as_deref().and_then(|k| self.playlist.position(k)) else {
            self.active = None;
            self.polling = false;
            return PollOutcome::Idle;
        };

        let elapsed = self.timer.elapsed(self.clock.now());
        let Some(track) = self.playlist.get_mut(index) else {
            return PollOutcome::Idle;
        };
        if track.state != PlaybackState::Playing {
            self.polling = false;
            return PollOutcome::Idle;
        }

        let drained = track
            .handle
            .as_ref()
            .is_some_and(|h| self.engine.is_finished(h));
        let finished = drained || track.duration.is_some_and(|total| elapsed >= total);

        track.position = track.duration.map_or(elapsed, |total| elapsed.min(total));
        if finished {
            return self.advance(index);
        }
        PollOutcome::Progress {
            position: track.position,
        }
    }

    fn advance(&mut self, finished: usize) -> PollOutcome {
        let Some(from) = self.playlist.get(finished).map(|t| t.path().to_path_buf()) else {
            return PollOutcome::Idle;
        };
        self.stop_active();

        let mut cursor = finished;
        while let Some(next) = self.playlist.next_playable_after(cursor) {
            self.start(next);
            if let Some(to) = self.active.clone() {
                info!(from = %from.display(), to = %to.display(), "auto-advanced");
                return PollOutcome::Advanced { from, to };
            }
            cursor = next;
        }

        info!(last = %from.display(), "reached end of playlist");
        PollOutcome::Finished { last: from }
    }

    fn start(&mut self, index: usize) {
        let now = self.clock.now();
        let Some(track) = self.playlist.get_mut(index) else {
            return;
        };
        let from = track.position;
        let Some(handle) = track.handle.as_mut() else {
            return;
        };

        if let Err(e) = self.engine.play(handle, from) {
            self.mark_failed(index, e);
            return;
        }

        track.state = PlaybackState::Playing;
        self.active = Some(track.path().to_path_buf());
        self.timer.start(now, from);
        self.polling = true;
        info!(track = %track.display(), from = ?from, "playing");
    }

    fn pause_active(&mut self) {
        let now = self.clock.now();
        let Some(track) = self.active.as_deref().and_then(|k| self.playlist.find_mut(k)) else {
            return;
        };
        if let Some(handle) = track.handle.as_mut() {
            self.engine.pause(handle);
        }
        let reached = self.timer.pause(now);
        track.position = track.duration.map_or(reached, |total| reached.min(total));
        track.state = PlaybackState::Paused;
        self.polling = false;
        debug!(track = %track.display(), "paused");
    }

    fn resume_active(&mut self) {
        let now = self.clock.now();
        let Some(track) = self.active.as_deref().and_then(|k| self.playlist.find_mut(k)) else {
            return;
        };
        if let Some(handle) = track.handle.as_mut() {
            self.engine.resume(handle);
        }
        self.timer.resume(now);
        track.state = PlaybackState::Playing;
        self.polling = true;
        debug!(track = %track.display(), "resumed");
    }

    fn stop_active(&mut self) {
        let Some(key) = self.active.take() else {
            return;
        };
        self.polling = false;
        self.drag = None;
        self.timer.reset();

        if let Some(track) = self.playlist.find_mut(&key) {
            if let Some(handle) = track.handle.as_mut() {
                self.engine.stop(handle);
            }
            track.reset();
            debug!(track = %track.display(), "stopped");
        }
    }

    fn seek_to(&mut self, index: usize, target: Duration) {
        let now = self.clock.now();
        let Some(track) = self.playlist.get_mut(index) else {
            return;
        };
        let paused = track.state == PlaybackState::Paused;
        let Some(handle) = track.handle.as_mut() else {
            return;
        };

        if let Err(e) = self.engine.play(handle, target) {
            self.mark_failed(index, e);
            return;
        }
        if paused {
            self.engine.pause(handle);
        }

        track.position = target;
        self.timer.rebase(now, target);
        debug!(track = %track.display(), to = ?target, "seeked");
    }

    /// The engine refused to play: release the handle and flag the track.
    fn mark_failed(&mut self, index: usize, error: AudioError) {
        let Some(track) = self.playlist.get_mut(index) else {
            return;
        };
        warn!(track = %track.display(), error = %error, "playback failed");

        if let Some(handle) = track.handle.take() {
            self.engine.release(handle);
        }
        track.reset();
        track.error = Some(error.to_string());

        if self.active.as_deref() == Some(track.path()) {
            self.active = None;
            self.polling = false;
            self.drag = None;
            self.timer.reset();
        }
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
