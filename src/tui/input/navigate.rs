use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::EditorSession;
use crate::tui::app::{App, Mode};
use crate::tui::editor::EditorState;

use super::report;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
        app.config.timeline.tick_interval.max(1)
    } else {
        1
    };
    let last = app.max_frames().saturating_sub(1);

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => {
            app.mode = Mode::Help;
            app.mark_dirty();
        }
        KeyCode::Left => app.move_cursor_to(app.cursor_frame.saturating_sub(step)),
        KeyCode::Right => app.move_cursor_to(app.cursor_frame.saturating_add(step)),
        KeyCode::Home => app.move_cursor_to(0),
        KeyCode::End => app.move_cursor_to(last),
        KeyCode::Char('[') => {
            if let Some(prev) = app.director.schedule().before(app.cursor_frame) {
                app.move_cursor_to(prev.frame);
            }
        }
        KeyCode::Char(']') => {
            if let Some(next) = app.director.schedule().after(app.cursor_frame) {
                app.move_cursor_to(next.frame);
            }
        }
        KeyCode::Char('.') => app.move_cursor_to(app.director.current_frame()),
        KeyCode::Enter => app.open_editor_at(app.cursor_frame),
        KeyCode::Char('e') => edit_marker_before_cursor(app),
        KeyCode::Char(' ') => {
            let result = app.director.toggle_play();
            report(app, result);
        }
        KeyCode::Char('s') => {
            let result = app.director.reset();
            if report(app, result) {
                app.set_status("Reset");
            }
        }
        KeyCode::Char('c') => app.toggle_connection(),
        _ => {}
    }
}

/// `e`: open the prompt in effect at the cursor for editing
fn edit_marker_before_cursor(app: &mut App) {
    if !app.is_connected() {
        app.set_error("Connect to the engine first (c)");
        return;
    }
    match app.director.schedule().nearest_at_or_before(app.cursor_frame) {
        Some(p) => {
            app.cursor_frame = p.frame;
            app.editor = Some(EditorState::new(EditorSession::edit(p.frame, p.text)));
            app.mode = Mode::Editor;
            app.mark_dirty();
        }
        None => app.set_error("No prompt at or before the cursor"),
    }
}

pub(super) fn handle_help(app: &mut App, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
    ) {
        app.mode = Mode::Navigate;
        app.mark_dirty();
    }
}
