//! Track playback controller.
//!
//! Everything here runs on the UI thread: key presses, mouse drags and the
//! polling tick all call into [`Controller`] one at a time, so no locking is
//! needed. Time comes from a [`Clock`] so polling can be driven by hand in
//! tests.

mod clock;
mod controller;
mod playlist;
mod timer;
mod track;

pub use clock::{Clock, SystemClock};
pub use controller::{Controller, ImportReport, PollOutcome};
pub use track::{PlaybackState, Track};

#[cfg(test)]
pub(crate) use clock::ManualClock;

#[cfg(test)]
mod tests;
