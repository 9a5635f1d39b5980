//! Light/dark palettes and the per-card style rules.
//!
//! `card_style` is a pure function of a track's state, so the renderer never
//! has to remember which card it highlighted last.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::playback::PlaybackState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Header glyph: the moon offers dark mode, the sun offers light mode.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub card: Color,
    pub card_active: Color,
    /// Played part of the seek bar, active borders, album-art glyph.
    pub accent: Color,
    /// Unplayed part of the seek bar.
    pub groove: Color,
    pub muted: Color,
    pub error: Color,
}

const BLUEVIOLET: Color = Color::Rgb(0x8a, 0x2b, 0xe2);

const DARK: Palette = Palette {
    background: Color::Rgb(0x1a, 0x1a, 0x1a),
    text: Color::Rgb(0xff, 0xff, 0xff),
    card: Color::Rgb(0x2a, 0x2a, 0x2a),
    card_active: Color::Rgb(0x3d, 0x3d, 0x3d),
    accent: Color::Rgb(0x70, 0x00, 0xa3),
    groove: Color::Rgb(0x33, 0x33, 0x33),
    muted: Color::Rgb(0x66, 0x66, 0x66),
    error: Color::Rgb(0xe0, 0x55, 0x55),
};

const LIGHT: Palette = Palette {
    background: Color::Rgb(0xff, 0xff, 0xff),
    text: Color::Rgb(0x1a, 0x1a, 0x1a),
    card: Color::Rgb(0xf0, 0xf0, 0xf0),
    card_active: Color::Rgb(0xe8, 0xdc, 0xf7),
    accent: BLUEVIOLET,
    groove: Color::Rgb(0xcc, 0xcc, 0xcc),
    muted: Color::Rgb(0x99, 0x99, 0x99),
    error: Color::Rgb(0xc0, 0x20, 0x20),
};

/// Everything the renderer needs to paint one track card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyle {
    pub body: Style,
    pub border: Style,
    pub border_type: BorderType,
    pub title: Style,
    pub gauge: Style,
    /// Transport button label: what pressing play would do next.
    pub icon: &'static str,
}

pub fn card_style(
    state: PlaybackState,
    playable: bool,
    selected: bool,
    palette: &Palette,
) -> CardStyle {
    let active = state != PlaybackState::Stopped;

    let mut body = Style::default().fg(palette.text).bg(palette.card);
    let mut border = Style::default().fg(palette.muted);
    let mut title = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);
    let mut gauge = Style::default().fg(palette.accent).bg(palette.groove);

    if active {
        body = body.bg(palette.card_active);
        border = Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD);
    }
    if !playable {
        body = body.fg(palette.muted).add_modifier(Modifier::DIM);
        title = Style::default().fg(palette.error);
        gauge = Style::default().fg(palette.muted).bg(palette.groove);
    }

    let icon = match state {
        PlaybackState::Playing => "⏸",
        PlaybackState::Paused | PlaybackState::Stopped => "▶",
    };

    CardStyle {
        body,
        border,
        border_type: if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        },
        title,
        gauge,
        icon,
    }
}
