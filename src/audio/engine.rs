use std::path::Path;
use std::time::Duration;

use super::error::AudioError;

/// A successfully loaded audio asset.
#[derive(Debug)]
pub struct LoadedAsset<H> {
    pub handle: H,
    /// Total length as reported by the decoder, when it knows it.
    pub duration: Option<Duration>,
}

/// Mixer operations the playback controller relies on.
///
/// Every handle belongs to exactly one track. `release` consumes it, so a
/// handle can never be used after its track is gone.
pub trait AudioEngine {
    type Handle;

    /// Open and probe `path`. Failing here marks the track unplayable.
    fn load(&mut self, path: &Path) -> Result<LoadedAsset<Self::Handle>, AudioError>;

    /// Start (or restart) playback at `from`.
    fn play(&mut self, handle: &mut Self::Handle, from: Duration) -> Result<(), AudioError>;

    fn pause(&mut self, handle: &mut Self::Handle);

    fn resume(&mut self, handle: &mut Self::Handle);

    /// Stop playback. Stopping an idle handle is a no-op.
    fn stop(&mut self, handle: &mut Self::Handle);

    /// `volume` is already clamped to `0.0..=1.0`.
    fn set_volume(&mut self, handle: &mut Self::Handle, volume: f32);

    /// True once a started handle has run out of samples.
    fn is_finished(&self, handle: &Self::Handle) -> bool;

    /// Fade out over `over`, then stop.
    fn fade_out(&mut self, handle: &mut Self::Handle, over: Duration) {
        let _ = over;
        self.stop(handle);
    }

    fn release(&mut self, handle: Self::Handle);
}
