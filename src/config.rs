//! Configuration loader, schema types and persisted preferences.
//!
//! `Settings` drives runtime behavior and is read-only once loaded.
//! `Preferences` is the small piece of state the app writes back (the theme).

mod load;
mod preferences;
mod schema;

pub use load::default_state_dir;
pub use preferences::{PreferenceStore, Preferences, PreferencesError};
pub use schema::*;
