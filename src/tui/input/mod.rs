mod editor;
mod mouse;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::director::DirectorError;

use super::app::{App, Mode};

use editor::handle_editor;
use navigate::{handle_help, handle_navigate};

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Editor => handle_editor(app, key),
        Mode::Help => handle_help(app, key),
    }
}

/// Bracketed paste goes into the focused editor field; ignored elsewhere.
pub fn handle_paste(app: &mut App, text: &str) {
    if app.mode != Mode::Editor || text.is_empty() {
        return;
    }
    if let Some(ed) = &mut app.editor {
        ed.focused_mut().insert_str(text);
        app.mark_dirty();
    }
}

/// Show a handler failure in the status row; success is silent.
fn report(app: &mut App, result: Result<(), DirectorError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            app.set_error(e.to_string());
            false
        }
    }
}
