use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

/// App name, connection status and engine url
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let status = app.director.connection();

    let mut spans = vec![
        Span::styled(
            " director ",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" \u{25CF} {} ", status),
            Style::default()
                .fg(app.theme.connection_color(status))
                .bg(bg),
        ),
    ];
    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint = "? help ";
    let room = (area.width as usize).saturating_sub(used + hint.len() + 1);
    spans.push(Span::styled(
        unicode::fit_to_width(&app.config.engine.url, room),
        Style::default().fg(app.theme.dim).bg(bg),
    ));
    spans.push(Span::styled(" ", Style::default().bg(bg)));
    spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));

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
    fn shows_connection_state() {
        let app = offline_app();
        let out = render_to_string(60, 1, |f, a| render_header(f, &app, a));
        assert!(out.contains("director"));
        assert!(out.contains("disconnected"));
        assert!(out.contains("ws://127.0.0.1:8080/ws"));
        assert!(out.ends_with("? help"));

        let app = app_with(0, &[]);
        let out = render_to_string(60, 1, |f, a| render_header(f, &app, a));
        assert!(out.contains("ready"));
    }
}
