use std::error::Error;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::config::PreferenceStore;
use crate::playback::Controller;

mod args;
mod event_loop;
mod logging;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn Error>> {
    let args = args::Args::parse();
    let (settings, settings_warning) = settings::load_settings(args.config.as_deref());

    let _log_guard = logging::init(&settings.logging, args.log_dir.as_deref())?;
    info!(version = env!("CARGO_PKG_VERSION"), "musicova starting");
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let store = PreferenceStore::locate();
    if let Some(store) = &store {
        debug!(path = %store.path().display(), "preferences file");
    }
    let theme = startup::initial_theme(store.as_ref(), settings.ui.dark_mode);

    let engine = RodioEngine::open_default()?;
    let player = Controller::new(engine, settings.audio.default_volume);
    let mut app = App::new(
        player,
        settings.library.clone(),
        settings.controls.clone(),
        theme,
    );
    if let Some(store) = store {
        app = app.with_preferences(store);
    }
    startup::import_cli_paths(&mut app, &args.paths);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut state);

    app.player
        .shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    info!("musicova stopped");
    run_result
}
