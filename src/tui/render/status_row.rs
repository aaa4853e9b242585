use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::hit_test::HitTarget;
use crate::ops::timecode;
use crate::tui::app::{App, Mode, StatusKind};
use crate::util::unicode;

/// Left side of the status row in navigate mode: hover readout, else what
/// Enter would do at the cursor.
pub fn position_text(app: &App) -> String {
    let fps = app.director.timeline().fps;
    if let Some(frame) = app.hover_frame {
        return format!("Frame {} ({})", frame, timecode::seconds_label(frame, fps));
    }
    let frame = app.cursor_frame;
    let mut text = format!(
        "Cursor {} ({})",
        frame,
        timecode::seconds_label(frame, fps)
    );
    if app.is_connected() {
        match app.director.classify(frame) {
            HitTarget::Edit(f) => {
                let prompt = app.director.schedule().get(f).unwrap_or_default();
                text.push_str(&format!("  Enter: edit @{} \"{}\"", f, prompt));
            }
            HitTarget::Create(_) => text.push_str("  Enter: add prompt"),
        }
    }
    text
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (left, left_style) = match &app.status {
        Some(msg) => {
            let fg = match msg.kind {
                StatusKind::Info => app.theme.text_bright,
                StatusKind::Error => app.theme.red,
            };
            (msg.text.clone(), Style::default().fg(fg).bg(bg))
        }
        None => (
            position_text(app),
            Style::default().fg(app.theme.text).bg(bg),
        ),
    };
    let hint = match app.mode {
        Mode::Navigate if app.is_connected() => "\u{2190}\u{2192} move  [ ] markers  ? help",
        Mode::Navigate => "c connect  ? help  q quit",
        Mode::Editor => "Enter save  Esc cancel",
        Mode::Help => "Esc close",
    };

    let hint_width = unicode::display_width(hint);
    let mut spans = Vec::new();
    if hint_width + 2 < width {
        let room = width - hint_width - 2;
        spans.push(Span::styled(
            unicode::fit_to_width(&format!(" {}", left), room),
            left_style,
        ));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    } else {
        spans.push(Span::styled(
            unicode::truncate_to_width(&format!(" {}", left), width),
            left_style,
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with, offline_app, render_to_string};

    #[test]
    fn hover_readout() {
        let mut app = app_with(0, &[]);
        app.hover_frame = Some(60);
        assert_eq!(position_text(&app), "Frame 60 (2.5s)");
    }

    #[test]
    fn cursor_readout_says_what_enter_does() {
        let mut app = app_with(0, &[(0, "temple"), (50, "dragon")]);
        app.cursor_frame = 52;
        assert_eq!(
            position_text(&app),
            "Cursor 52 (2.2s)  Enter: edit @50 \"dragon\""
        );
        app.cursor_frame = 40;
        assert_eq!(position_text(&app), "Cursor 40 (1.7s)  Enter: add prompt");
    }

    #[test]
    fn status_message_replaces_readout() {
        let mut app = offline_app();
        app.set_error("Disconnected from engine");
        let out = render_to_string(80, 1, |f, a| render_status_row(f, &app, a));
        assert!(out.starts_with(" Disconnected from engine"));
        assert!(out.ends_with("c connect  ? help  q quit"));
    }
}
