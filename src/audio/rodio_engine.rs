use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::engine::{AudioEngine, LoadedAsset};
use super::error::AudioError;
use super::sink::{create_sink_at, open_source};

const FADE_STEPS: u64 = 20;

/// `AudioEngine` backed by the default `rodio` output device.
pub struct RodioEngine {
    stream: OutputStream,
}

/// A loaded track. The sink only exists while the track has been started.
pub struct RodioHandle {
    path: PathBuf,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioEngine {
    pub fn open_default() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::OutputDevice(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioEngine for RodioEngine {
    type Handle = RodioHandle;

    fn load(&mut self, path: &Path) -> Result<LoadedAsset<RodioHandle>, AudioError> {
        let duration = open_source(path)?.total_duration();
        Ok(LoadedAsset {
            handle: RodioHandle {
                path: path.to_path_buf(),
                sink: None,
                volume: 1.0,
            },
            duration,
        })
    }

    fn play(&mut self, handle: &mut RodioHandle, from: Duration) -> Result<(), AudioError> {
        let sink = create_sink_at(&self.stream, &handle.path, from, handle.volume)?;
        if let Some(old) = handle.sink.take() {
            old.stop();
        }
        sink.play();
        handle.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self, handle: &mut RodioHandle) {
        if let Some(sink) = handle.sink.as_ref() {
            sink.pause();
        }
    }

    fn resume(&mut self, handle: &mut RodioHandle) {
        if let Some(sink) = handle.sink.as_ref() {
            sink.play();
        }
    }

    fn stop(&mut self, handle: &mut RodioHandle) {
        if let Some(sink) = handle.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, handle: &mut RodioHandle, volume: f32) {
        handle.volume = volume;
        if let Some(sink) = handle.sink.as_ref() {
            sink.set_volume(volume);
        }
    }

    fn is_finished(&self, handle: &RodioHandle) -> bool {
        handle.sink.as_ref().is_some_and(|s| s.empty())
    }

    fn fade_out(&mut self, handle: &mut RodioHandle, over: Duration) {
        if let Some(sink) = handle.sink.as_ref().filter(|_| !over.is_zero()) {
            let step = Duration::from_millis((over.as_millis() as u64 / FADE_STEPS).max(1));
            let start = handle.volume;
            for i in 1..=FADE_STEPS {
                let t = i as f32 / FADE_STEPS as f32;
                sink.set_volume(start * (1.0 - t));
                thread::sleep(step);
            }
        }
        self.stop(handle);
    }

    fn release(&mut self, mut handle: RodioHandle) {
        self.stop(&mut handle);
        debug!(path = %handle.path.display(), "released audio handle");
    }
}
