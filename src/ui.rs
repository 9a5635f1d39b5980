//! UI rendering helpers for the terminal user interface.
//!
//! `draw` paints one frame from the `App` and returns where each visible seek
//! bar landed, so mouse events can be mapped back to a track and position.

use std::path::PathBuf;
use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::audio::AudioEngine;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::playback::{Clock, PlaybackState, Track};
use crate::theme::{Palette, card_style};

/// Rows taken by one track card, borders included.
const CARD_HEIGHT: u16 = 6;

/// Screen region of one card's seek gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekBar {
    pub key: PathBuf,
    pub area: Rect,
    pub duration: Option<Duration>,
}

impl SeekBar {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.area.x
            && column < self.area.x.saturating_add(self.area.width)
            && row >= self.area.y
            && row < self.area.y.saturating_add(self.area.height)
    }

    /// Position in seconds under `column`. Columns outside the bar clamp to
    /// its ends, so a drag that leaves the bar still tracks.
    pub fn secs_at(&self, column: u16) -> Option<f64> {
        let total = self.duration?;
        if self.area.width == 0 {
            return None;
        }
        let span = f64::from(self.area.width.saturating_sub(1).max(1));
        let offset = f64::from(column.saturating_sub(self.area.x));
        Some((offset / span).clamp(0.0, 1.0) * total.as_secs_f64())
    }
}

fn controls_text(controls: &ControlsSettings) -> String {
    let volume_pct = (controls.volume_step * 100.0).round();
    [
        "[j/k] select".to_string(),
        "[enter/space/p] play/pause".to_string(),
        format!("[H/L] seek -/+{}s", controls.scrub_seconds),
        "[0/home] restart".to_string(),
        format!("[+/-] volume {volume_pct}%"),
        "[i] import".to_string(),
        "[x] remove".to_string(),
        "[C] clear all".to_string(),
        "[t] theme".to_string(),
        "[q] quit".to_string(),
        "mouse: drag seek bar".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `M:SS`.
fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the card's time label from the configured fields.
fn time_text(position: Duration, total: Option<Duration>, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_clock(position)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_clock(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_clock(t.saturating_sub(position))));
                }
            }
        }
    }
    parts.join(&ui.time_separator)
}

/// Slice of cards to show so the selected one stays visible, centered when
/// possible. Returns `(start, end)`.
fn visible_window(total: usize, capacity: usize, selected: usize) -> (usize, usize) {
    if capacity == 0 {
        return (0, 0);
    }
    if total <= capacity {
        return (0, total);
    }
    let selected = selected.min(total - 1);
    let half = capacity / 2;
    let mut start = selected.saturating_sub(half);
    if start + capacity > total {
        start = total - capacity;
    }
    (start, start + capacity)
}

fn status_text<E: AudioEngine, C: Clock>(app: &App<E, C>) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.player.active_track() {
        Some(track) => {
            let state = match track.state() {
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused => "Paused",
                PlaybackState::Stopped => "Stopped",
            };
            parts.push(format!("{state}: {}", track.display()));
        }
        None => parts.push("Stopped".to_string()),
    }
    parts.push(format!("Tracks: {}", app.player.len()));
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    parts.join(" • ")
}

fn draw_card<H>(
    frame: &mut Frame,
    area: Rect,
    track: &Track<H>,
    selected: bool,
    palette: &Palette,
    ui: &UiSettings,
) -> SeekBar {
    let style = card_style(track.state(), track.is_playable(), selected, palette);
    let block = Block::bordered()
        .border_type(style.border_type)
        .border_style(style.border)
        .style(style.body)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [name_row, time_row, seek_row, volume_row] =
        Layout::vertical([Constraint::Length(1); 4]).areas(inner);

    let mut name = vec![
        Span::styled("♫ ", Style::default().fg(palette.accent)),
        Span::styled(track.display(), style.title),
    ];
    if !track.is_playable() {
        name.push(Span::styled("  (Error)", Style::default().fg(palette.error)));
    }
    frame.render_widget(Paragraph::new(Line::from(name)), name_row);

    let detail = match track.error() {
        Some(err) => Line::from(Span::styled(err, Style::default().fg(palette.error))),
        None => Line::from(vec![
            Span::styled(format!("{} ", style.icon), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(time_text(track.position(), track.duration(), ui)),
        ]),
    };
    frame.render_widget(Paragraph::new(detail), time_row);

    let seek = Gauge::default()
        .gauge_style(style.gauge)
        .ratio(track.progress())
        .label("")
        .use_unicode(true);
    frame.render_widget(seek, seek_row);

    let volume = f64::from(track.volume()).clamp(0.0, 1.0);
    let volume_gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.muted).bg(palette.groove))
        .ratio(volume)
        .label(format!("vol {:.0}%", volume * 100.0));
    frame.render_widget(volume_gauge, volume_row);

    SeekBar {
        key: track.path().to_path_buf(),
        area: seek_row,
        duration: track.duration(),
    }
}

/// Render the entire UI into `frame`. Returns the seek bars of the cards
/// that were drawn.
pub fn draw<E: AudioEngine, C: Clock>(
    frame: &mut Frame,
    app: &App<E, C>,
    ui_settings: &UiSettings,
) -> Vec<SeekBar> {
    let palette = app.theme.palette();
    let base = Style::default().fg(palette.text).bg(palette.background);
    frame.render_widget(Block::default().style(base), frame.area());

    let prompt_height = if app.is_typing() { 3 } else { 0 };
    let [header_area, status_area, cards_area, prompt_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(CARD_HEIGHT),
        Constraint::Length(prompt_height),
        Constraint::Length(4),
    ])
    .areas(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(" musicova ")
                .title_alignment(Alignment::Center)
                .title_top(Line::from(format!(" {} ", app.theme.glyph())).right_aligned()),
        );
    frame.render_widget(header, header_area);

    let status = Paragraph::new(status_text(app)).block(
        Block::bordered()
            .padding(Padding::horizontal(1))
            .title(" status "),
    );
    frame.render_widget(status, status_area);

    let tracks = app.player.tracks();
    let mut bars = Vec::new();
    if app.player.is_empty() {
        let empty = Paragraph::new("No tracks yet. Press [i] to import a file or folder.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(Block::bordered().title(" tracks "));
        frame.render_widget(empty, cards_area);
    } else {
        let capacity = usize::from(cards_area.height / CARD_HEIGHT);
        let (start, end) = visible_window(tracks.len(), capacity, app.selected);
        for (slot, index) in (start..end).enumerate() {
            let Some(track) = tracks.get(index) else {
                continue;
            };
            let Ok(offset) = u16::try_from(slot) else {
                break;
            };
            let area = Rect {
                y: cards_area.y + offset * CARD_HEIGHT,
                height: CARD_HEIGHT,
                ..cards_area
            };
            bars.push(draw_card(
                frame,
                area,
                track,
                index == app.selected,
                palette,
                ui_settings,
            ));
        }
    }

    if let InputMode::Import(buf) = &app.input {
        frame.render_widget(Clear, prompt_area);
        let prompt = Paragraph::new(format!("{buf}▏")).block(
            Block::bordered()
                .border_style(Style::default().fg(palette.accent))
                .padding(Padding::horizontal(1))
                .title(" import file or folder (enter to add, esc to cancel) "),
        );
        frame.render_widget(prompt, prompt_area);
    }

    let footer = Paragraph::new(controls_text(app.controls()))
        .block(
            Block::bordered()
                .title(" controls ")
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, footer_area);

    bars
}
