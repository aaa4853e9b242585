use ratatui::style::Color;

use crate::model::{ConnectionStatus, PlaybackPhase, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub playhead: Color,
    pub cursor_bg: Color,
    /// Cycled across timeline segments so neighbours differ
    pub segments: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            playhead: Color::Rgb(0xFF, 0xFF, 0xFF),
            cursor_bg: Color::Rgb(0x3D, 0x14, 0x38),
            segments: vec![
                Color::Rgb(0x44, 0x88, 0xFF),
                Color::Rgb(0xCC, 0x66, 0xFF),
                Color::Rgb(0x44, 0xDD, 0xFF),
                Color::Rgb(0x44, 0xFF, 0x88),
            ],
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Apply `[ui.colors]` overrides on top of the defaults.
    /// Unknown keys and malformed values are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                log::warn!("ignoring color {} = {:?}: not #RRGGBB", key, value);
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "playhead" => theme.playhead = color,
                "cursor_bg" => theme.cursor_bg = color,
                other => {
                    if let Some(idx) = other
                        .strip_prefix("segment")
                        .and_then(|n| n.parse::<usize>().ok())
                        && let Some(slot) = theme.segments.get_mut(idx)
                    {
                        *slot = color;
                    }
                }
            }
        }
        theme
    }

    /// Color of the `index`-th segment on the track
    pub fn segment_color(&self, index: usize) -> Color {
        if self.segments.is_empty() {
            return self.text;
        }
        self.segments[index % self.segments.len()]
    }

    pub fn phase_color(&self, phase: PlaybackPhase) -> Color {
        match phase {
            PlaybackPhase::NotStarted => self.dim,
            PlaybackPhase::Playing => self.green,
            PlaybackPhase::Paused => self.yellow,
        }
    }

    pub fn connection_color(&self, status: ConnectionStatus) -> Color {
        match status {
            ConnectionStatus::Disconnected => self.red,
            ConnectionStatus::Connecting | ConnectionStatus::Waiting => self.yellow,
            ConnectionStatus::Ready => self.green,
        }
    }
}
