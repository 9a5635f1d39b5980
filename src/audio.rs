//! Audio playback capability.
//!
//! The playback controller never decodes audio itself: it drives an
//! [`AudioEngine`], which hands out one exclusively owned handle per loaded
//! track. [`RodioEngine`] is the implementation used by the binary.

mod engine;
mod error;
mod rodio_engine;
mod sink;

#[cfg(test)]
pub(crate) mod fake;

pub use engine::AudioEngine;
pub use error::AudioError;
pub use rodio_engine::RodioEngine;
