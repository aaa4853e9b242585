use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::timecode;
use crate::tui::app::App;
use crate::util::unicode;

/// Play/pause and reset affordances, then the frame readout on the right
pub fn render_transport_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let controls = app.director.transport();

    let enabled = |disabled: bool| {
        if disabled {
            Style::default().fg(app.theme.dim).bg(bg)
        } else {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        }
    };
    let key_style = Style::default().fg(app.theme.highlight).bg(bg);

    let play_glyph = if controls.show_play { "\u{25B6}" } else { "\u{275A}\u{275A}" };
    let mut spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            format!("{} {}", play_glyph, controls.play_tooltip),
            enabled(controls.play_disabled),
        ),
        Span::styled(" space", key_style),
        Span::styled("   ", Style::default().bg(bg)),
        Span::styled(
            format!("\u{25A0} {}", controls.reset_tooltip),
            enabled(controls.reset_disabled),
        ),
        Span::styled(" s", key_style),
    ];

    let readout = timecode::frame_readout(app.director.current_frame(), app.director.timeline());
    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let readout_width = unicode::display_width(&readout) + 1;
    if used + readout_width < area.width as usize {
        let pad = area.width as usize - used - readout_width;
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(
            readout,
            Style::default().fg(app.theme.text).bg(bg),
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
    use crate::tui::render::test_helpers::{app_with, app_with_snapshot, offline_app, render_to_string};

    fn bar(app: &App) -> String {
        render_to_string(80, 1, |f, a| render_transport_bar(f, app, a))
    }

    #[test]
    fn offline_asks_for_a_connection() {
        let out = bar(&offline_app());
        assert!(out.contains("\u{25B6} Connect first"));
        assert!(out.ends_with("00:00 / 10s  Frame 0 / 240"));
    }

    #[test]
    fn follows_phase() {
        assert!(bar(&app_with(0, &[])).contains("Add a prompt at frame 0 to start"));
        assert!(bar(&app_with(0, &[(0, "temple")])).contains("\u{25B6} Play"));
        assert!(bar(&app_with(125, &[(0, "temple")])).contains("\u{275A}\u{275A} Pause"));
        let paused = bar(&app_with_snapshot(125, true, &[(0, "temple")]));
        assert!(paused.contains("\u{25B6} Resume"));
        assert!(paused.ends_with("05:05 / 10s  Frame 125 / 240"));
    }
}
