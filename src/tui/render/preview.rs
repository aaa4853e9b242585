use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

pub const EMPTY_HINT: &str = "No prompt active: move to frame 0 and press Enter to add one";

/// Phase badge, the prompt being generated, and the latest engine event
pub fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let phase = app.director.phase();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            " Preview ",
            Style::default().fg(app.theme.text_bright).bg(bg),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let badge = Span::styled(
        format!(" {} ", phase.label()),
        Style::default()
            .fg(bg)
            .bg(app.theme.phase_color(phase))
            .add_modifier(Modifier::BOLD),
    );
    let badge_width = unicode::display_width(&badge.content) + 1;
    let text_width = (inner.width as usize).saturating_sub(badge_width).max(1);

    // The engine's own word wins; fall back to the schedule.
    let prompt = app
        .director
        .current_prompt()
        .map(str::to_string)
        .or_else(|| app.director.active_prompt().map(|p| p.text));

    let last_event = app.director.recent_events().last();
    let reserved = usize::from(last_event.is_some() && inner.height > 1);

    let mut lines = Vec::new();
    match prompt {
        Some(text) => {
            let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
            let max_rows = (inner.height as usize).saturating_sub(reserved).max(1);
            let rows = unicode::wrap_ranges(&text, text_width);
            let truncated = rows.len() > max_rows;
            for (i, range) in rows.into_iter().take(max_rows).enumerate() {
                let mut row = text[range].trim_end().to_string();
                if truncated && i + 1 == max_rows {
                    row = unicode::truncate_to_width(&format!("{}\u{2026}", row), text_width);
                }
                let lead = if i == 0 {
                    badge.clone()
                } else {
                    Span::styled(" ".repeat(badge_width - 1), Style::default().bg(bg))
                };
                lines.push(Line::from(vec![
                    lead,
                    Span::styled(" ", Style::default().bg(bg)),
                    Span::styled(row, text_style),
                ]));
            }
        }
        None => lines.push(Line::from(vec![
            badge,
            Span::styled(" ", Style::default().bg(bg)),
            Span::styled(
                unicode::truncate_to_width(EMPTY_HINT, text_width),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ])),
    }

    // Bottom line: most recent engine event
    if let Some(record) = last_event
        && reserved == 1
    {
        while (lines.len() as u16) < inner.height - 1 {
            lines.push(Line::from(""));
        }
        let text = format!(
            "{}  {}",
            record.at.format("%H:%M:%S"),
            record.event.summary()
        );
        lines.push(Line::from(Span::styled(
            unicode::truncate_to_width(&text, inner.width as usize),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(bg)),
        inner,
    );
}
