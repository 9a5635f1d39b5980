//! In-memory `AudioEngine` for controller tests.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::engine::{AudioEngine, LoadedAsset};
use super::error::AudioError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Load(PathBuf),
    Play(PathBuf, Duration),
    Pause(PathBuf),
    Resume(PathBuf),
    Stop(PathBuf),
    Volume(PathBuf, f32),
    FadeOut(PathBuf),
    Release(PathBuf),
}

#[derive(Debug)]
pub(crate) struct FakeHandle {
    path: PathBuf,
}

#[derive(Debug, Default)]
pub(crate) struct FakeEngine {
    durations: HashMap<PathBuf, Duration>,
    unloadable: HashSet<PathBuf>,
    unplayable: HashSet<PathBuf>,
    drained: HashSet<PathBuf>,
    pub ops: Vec<Op>,
    pub live_handles: usize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, path: &str, secs: u64) -> Self {
        self.durations
            .insert(PathBuf::from(path), Duration::from_secs(secs));
        self
    }

    pub fn failing_load(mut self, path: &str) -> Self {
        self.unloadable.insert(PathBuf::from(path));
        self
    }

    pub fn failing_play(mut self, path: &str) -> Self {
        self.unplayable.insert(PathBuf::from(path));
        self
    }

    /// Make `path` report itself drained until it is played again.
    pub fn drain(&mut self, path: &str) {
        self.drained.insert(PathBuf::from(path));
    }

    pub fn plays_of(&self, path: &str) -> Vec<Duration> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Play(p, from) if p == Path::new(path) => Some(*from),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Op) -> usize {
        self.ops.iter().filter(|op| *op == wanted).count()
    }
}

impl AudioEngine for FakeEngine {
    type Handle = FakeHandle;

    fn load(&mut self, path: &Path) -> Result<LoadedAsset<FakeHandle>, AudioError> {
        self.ops.push(Op::Load(path.to_path_buf()));
        if self.unloadable.contains(path) {
            return Err(AudioError::Decode {
                path: path.to_path_buf(),
                reason: "not audio".to_string(),
            });
        }
        self.live_handles += 1;
        Ok(LoadedAsset {
            handle: FakeHandle {
                path: path.to_path_buf(),
            },
            duration: self.durations.get(path).copied(),
        })
    }

    fn play(&mut self, handle: &mut FakeHandle, from: Duration) -> Result<(), AudioError> {
        if self.unplayable.contains(&handle.path) {
            return Err(AudioError::Open {
                path: handle.path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            });
        }
        self.drained.remove(&handle.path);
        self.ops.push(Op::Play(handle.path.clone(), from));
        Ok(())
    }

    fn pause(&mut self, handle: &mut FakeHandle) {
        self.ops.push(Op::Pause(handle.path.clone()));
    }

    fn resume(&mut self, handle: &mut FakeHandle) {
        self.ops.push(Op::Resume(handle.path.clone()));
    }

    fn stop(&mut self, handle: &mut FakeHandle) {
        self.ops.push(Op::Stop(handle.path.clone()));
    }

    fn set_volume(&mut self, handle: &mut FakeHandle, volume: f32) {
        self.ops.push(Op::Volume(handle.path.clone(), volume));
    }

    fn is_finished(&self, handle: &FakeHandle) -> bool {
        self.drained.contains(&handle.path)
    }

    fn fade_out(&mut self, handle: &mut FakeHandle, _over: Duration) {
        self.ops.push(Op::FadeOut(handle.path.clone()));
        self.stop(handle);
    }

    fn release(&mut self, handle: FakeHandle) {
        self.live_handles -= 1;
        self.ops.push(Op::Release(handle.path));
    }
}
