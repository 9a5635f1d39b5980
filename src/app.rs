//! Application context: the playback controller plus everything the UI needs
//! around it (selection, theme, import prompt, status line).
//!
//! User input is turned into [`Action`]s and applied with [`App::dispatch`].

mod action;
mod model;

pub use action::Action;
pub use model::{App, InputMode};
