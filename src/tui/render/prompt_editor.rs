use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ops::timecode;
use crate::tui::app::App;
use crate::tui::editor::{EditorState, Field, TextField};
use crate::util::unicode;

use super::centered;

const WIDTH: u16 = 64;
const HEIGHT: u16 = 14;

/// The add/edit prompt dialog
pub fn render_prompt_editor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ed) = &app.editor else {
        return;
    };
    let bg = app.theme.background;
    let dialog = centered(WIDTH, HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            format!(" {} ", ed.session.title()),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);
    if inner.width < 4 || inner.height < 2 {
        return;
    }
    let w = inner.width as usize;

    let text = Style::default().fg(app.theme.text).bg(bg);
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let label = Style::default().fg(app.theme.text_bright).bg(bg);
    let key = Style::default().fg(app.theme.highlight).bg(bg);

    let fps = app.director.timeline().fps;
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} ({})",
                ed.session.description(),
                timecode::seconds_label(ed.session.frame, fps)
            ),
            dim,
        )),
        Line::from(""),
        Line::from(Span::styled("Prompt", label)),
    ];
    let prompt_row = lines.len();
    lines.push(field_line(&ed.prompt, ed.focus == Field::Prompt, w, app));

    lines.push(enhance_line(ed, app, w));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enhanced Prompt", label),
        Span::styled(" (optional)", dim),
    ]));
    let enhanced_row = lines.len();
    lines.push(field_line(&ed.enhanced, ed.focus == Field::Enhanced, w, app));
    lines.push(Line::from(Span::styled(
        if ed.enhanced.is_blank() {
            "If empty, the original prompt above will be used."
        } else {
            "This enhanced version will be used when you save."
        },
        dim,
    )));
    lines.push(Line::from(""));

    let mut footer = vec![
        Span::styled("Enter", key),
        Span::styled(" save  ", text),
        Span::styled("Esc", key),
        Span::styled(" cancel  ", text),
        Span::styled("Tab", key),
        Span::styled(" switch field", text),
    ];
    if ed.session.can_delete() {
        footer.push(Span::styled("  Ctrl-D", key));
        footer.push(Span::styled(" delete", text));
    }
    lines.push(Line::from(footer));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);

    let (field, row) = match ed.focus {
        Field::Prompt => (&ed.prompt, prompt_row),
        Field::Enhanced => (&ed.enhanced, enhanced_row),
    };
    if (row as u16) < inner.height {
        let col = visible_cursor_col(field, w);
        frame.set_cursor_position(Position::new(inner.x + col as u16, inner.y + row as u16));
    }
}

/// One-row view of a field, scrolled so the cursor stays visible
fn field_line<'a>(field: &TextField, focused: bool, width: usize, app: &App) -> Line<'a> {
    let bg = if focused {
        app.theme.cursor_bg
    } else {
        app.theme.background
    };
    let style = Style::default().fg(app.theme.text_bright).bg(bg);
    let start = scroll_offset(field, width);
    let visible = unicode::fit_to_width(&field.text()[start..], width);
    Line::from(Span::styled(visible, style))
}

/// Byte offset of the first visible grapheme so the cursor fits in `width`
fn scroll_offset(field: &TextField, width: usize) -> usize {
    let text = field.text();
    let mut start = 0;
    while unicode::offset_to_col(&text[start..], field.cursor() - start) >= width {
        match unicode::next_grapheme_boundary(text, start) {
            Some(next) if next <= field.cursor() => start = next,
            _ => break,
        }
    }
    start
}

fn visible_cursor_col(field: &TextField, width: usize) -> usize {
    let start = scroll_offset(field, width);
    unicode::offset_to_col(&field.text()[start..], field.cursor() - start).min(width - 1)
}

fn enhance_line<'a>(ed: &EditorState, app: &App, width: usize) -> Line<'a> {
    let bg = app.theme.background;
    if ed.enhancing.is_some() {
        return Line::from(Span::styled(
            "Enhancing\u{2026}",
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }
    let mut spans = vec![
        Span::styled("Ctrl-E", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            " enhance prompt",
            Style::default()
                .fg(if ed.can_enhance() {
                    app.theme.text
                } else {
                    app.theme.dim
                })
                .bg(bg),
        ),
    ];
    if let Some(err) = &ed.enhance_error {
        let room = width.saturating_sub(23);
        spans.push(Span::styled("  ", Style::default().bg(bg)));
        spans.push(Span::styled(
            unicode::truncate_to_width(err, room),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with, render_to_string};

    #[test]
    fn create_dialog() {
        let mut app = app_with(0, &[]);
        app.open_editor_at(60);
        let out = render_to_string(80, 20, |f, a| render_prompt_editor(f, &app, a));
        assert!(out.contains("Add Prompt"));
        assert!(out.contains("Add a new prompt starting at frame 60 (2.5s)"));
        assert!(out.contains("If empty, the original prompt above will be used."));
        assert!(!out.contains("Ctrl-D"));
    }

    #[test]
    fn edit_dialog_offers_delete_past_frame_zero() {
        let mut app = app_with(0, &[(0, "temple"), (60, "dragon")]);
        app.open_editor_at(60);
        let out = render_to_string(80, 20, |f, a| render_prompt_editor(f, &app, a));
        assert!(out.contains("Edit Prompt"));
        assert!(out.contains("dragon"));
        assert!(out.contains("Ctrl-D delete"));

        app.close_editor();
        app.open_editor_at(0);
        let out = render_to_string(80, 20, |f, a| render_prompt_editor(f, &app, a));
        assert!(!out.contains("Ctrl-D"));
    }

    #[test]
    fn enhance_error_is_inline() {
        let mut app = app_with(0, &[]);
        app.open_editor_at(0);
        if let Some(ed) = &mut app.editor {
            ed.prompt.set("temple");
            ed.enhancing = Some(1);
            ed.finish_enhance(1, Err("Invalid API key".into()));
        }
        let out = render_to_string(80, 20, |f, a| render_prompt_editor(f, &app, a));
        assert!(out.contains("Invalid API key"));
    }

    #[test]
    fn long_text_scrolls_to_cursor() {
        let field = TextField::new("x".repeat(100));
        let start = scroll_offset(&field, 20);
        assert_eq!(start, 81);
        assert_eq!(visible_cursor_col(&field, 20), 19);
        let mut field = field;
        field.home();
        assert_eq!(scroll_offset(&field, 20), 0);
    }
}
