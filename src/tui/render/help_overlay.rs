use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered;

const TIMELINE: &[(&str, &str)] = &[
    ("\u{2190}/\u{2192}", "Move cursor one frame"),
    ("Shift+\u{2190}/\u{2192}", "Move cursor one tick"),
    ("Home/End", "First/last frame"),
    ("[ / ]", "Previous/next prompt"),
    (".", "Cursor to playhead"),
    ("Enter / click", "Edit nearby prompt, or add one"),
    ("e", "Edit the prompt in effect at the cursor"),
];

const PLAYBACK: &[(&str, &str)] = &[
    ("Space", "Play / pause / resume"),
    ("s", "Reset (clears the timeline)"),
    ("c", "Connect / disconnect"),
];

const EDITOR: &[(&str, &str)] = &[
    ("Tab", "Switch field"),
    ("Ctrl-E", "Enhance prompt"),
    ("Enter", "Save"),
    ("Ctrl-D", "Delete (not at frame 0)"),
    ("Esc", "Cancel"),
];

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let rows = TIMELINE.len() + PLAYBACK.len() + EDITOR.len() + 11;
    let overlay = centered(56, rows as u16, area);
    frame.render_widget(Clear, overlay);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(" Key Bindings", header_style)),
        Line::from(""),
    ];
    for (title, bindings) in [
        (" Timeline", TIMELINE),
        (" Playback", PLAYBACK),
        (" Prompt editor", EDITOR),
    ] {
        lines.push(Line::from(Span::styled(title, header_style)));
        for (key, desc) in bindings {
            add_binding(&mut lines, key, desc, key_style, desc_style);
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(" Global", header_style)));
    add_binding(&mut lines, "?", "Toggle this help", key_style, desc_style);
    add_binding(&mut lines, "q / Ctrl-C", "Quit", key_style, desc_style);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(bg)),
        overlay,
    );
}

fn add_binding<'a>(
    lines: &mut Vec<Line<'a>>,
    key: &'a str,
    desc: &'a str,
    key_style: Style,
    desc_style: Style,
) {
    lines.push(Line::from(vec![
        Span::styled(format!("   {:<18}", key), key_style),
        Span::styled(desc, desc_style),
    ]));
}
