use std::error::Error;
use std::io::Stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{Action, App};
use crate::audio::AudioEngine;
use crate::config;
use crate::playback::{Clock, PollOutcome};
use crate::ui::{self, SeekBar};

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Seek bars from the last frame, for mouse hit-testing.
    pub seek_bars: Vec<SeekBar>,
    /// Bar grabbed by the mouse, held until the button is released.
    pub grabbed: Option<SeekBar>,
}

/// Main terminal event loop: draws, handles input and runs the polling tick.
/// Returns `Ok(())` when the user quits.
pub fn run<E: AudioEngine, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &config::Settings,
    app: &mut App<E, C>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_millis(settings.audio.poll_interval_ms.max(1));
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| state.seek_bars = ui::draw(f, app, &settings.ui))?;

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, app) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, state),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            if app.player.is_polling() {
                on_tick(app);
            }
        }
    }
}

/// One polling tick. Selection follows auto-advance.
pub(super) fn on_tick<E: AudioEngine, C: Clock>(app: &mut App<E, C>) {
    match app.player.poll() {
        PollOutcome::Advanced { from, to } => {
            if app.selected_key().as_deref() == Some(from.as_path()) {
                app.select(&to);
            }
        }
        PollOutcome::Finished { last } => {
            info!(last = %last.display(), "playlist finished");
            app.status = Some("End of playlist".to_string());
        }
        PollOutcome::Idle | PollOutcome::Progress { .. } => {}
    }
}

/// Map a key press in normal mode to the action it triggers.
pub(super) fn action_for_key<E: AudioEngine, C: Clock>(
    key: KeyEvent,
    app: &App<E, C>,
) -> Option<Action> {
    let controls = app.controls();
    let scrub = controls.scrub_seconds as f64;
    let step = controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('C') => return Some(Action::ClearAll),
        KeyCode::Char('t') => return Some(Action::ToggleTheme),
        _ => {}
    }

    let selected = app.selected_key()?;
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
            Some(Action::TogglePlay(selected))
        }
        KeyCode::Char('H') | KeyCode::Left => Some(Action::SeekBy(selected, -scrub)),
        KeyCode::Char('L') | KeyCode::Right => Some(Action::SeekBy(selected, scrub)),
        KeyCode::Char('0') | KeyCode::Home => Some(Action::SeekTo(selected, 0.0)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::AdjustVolume(selected, step)),
        KeyCode::Char('-') => Some(Action::AdjustVolume(selected, -step)),
        KeyCode::Char('x') | KeyCode::Delete => Some(Action::Remove(selected)),
        _ => None,
    }
}

/// Returns `true` when the app should quit.
pub(super) fn handle_key_event<E: AudioEngine, C: Clock>(
    key: KeyEvent,
    app: &mut App<E, C>,
) -> bool {
    if app.is_typing() {
        match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => app.pop_input(),
            KeyCode::Enter => {
                if let Some(action) = app.submit_input() {
                    app.dispatch(action);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_input(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('i') => app.begin_import(),
        _ => {
            if let Some(action) = action_for_key(key, app) {
                return app.dispatch(action);
            }
        }
    }
    false
}

/// Press, drag and release on a seek bar become a drag on that track.
pub(super) fn handle_mouse_event<E: AudioEngine, C: Clock>(
    mouse: MouseEvent,
    app: &mut App<E, C>,
    state: &mut EventLoopState,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(bar) = state
                .seek_bars
                .iter()
                .find(|b| b.contains(mouse.column, mouse.row))
                .cloned()
            else {
                return;
            };
            app.select(&bar.key);
            app.dispatch(Action::BeginDrag(bar.key.clone()));
            if !app.player.is_dragging(&bar.key) {
                debug!(path = %bar.key.display(), "seek bar of inactive track ignored");
                return;
            }
            if let Some(secs) = bar.secs_at(mouse.column) {
                app.dispatch(Action::DragTo(bar.key.clone(), secs));
            }
            state.grabbed = Some(bar);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(bar) = &state.grabbed else {
                return;
            };
            if let Some(secs) = bar.secs_at(mouse.column) {
                app.dispatch(Action::DragTo(bar.key.clone(), secs));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(bar) = state.grabbed.take() else {
                return;
            };
            if let Some(secs) = bar.secs_at(mouse.column) {
                app.dispatch(Action::DragTo(bar.key.clone(), secs));
            }
            app.dispatch(Action::EndDrag(bar.key));
        }
        _ => {}
    }
}
