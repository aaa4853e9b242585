use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;

use crate::ops::director::DirectorError;
use crate::tui::app::App;

pub(super) fn handle_editor(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let word = ctrl || key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Enter => save(app),
        KeyCode::Char('e') if ctrl => enhance(app),
        KeyCode::Char('d') if ctrl => delete(app),
        KeyCode::Tab | KeyCode::BackTab => {
            if let Some(ed) = &mut app.editor {
                ed.toggle_focus();
            }
        }
        _ => {
            let Some(ed) = &mut app.editor else {
                return;
            };
            let field = ed.focused_mut();
            match key.code {
                KeyCode::Char('w') if ctrl => field.delete_word(),
                KeyCode::Char('a') if ctrl => field.home(),
                KeyCode::Char(c) if !ctrl => field.insert_char(c),
                KeyCode::Backspace if word => field.delete_word(),
                KeyCode::Backspace => field.backspace(),
                KeyCode::Delete => field.delete(),
                KeyCode::Left if word => field.word_left(),
                KeyCode::Right if word => field.word_right(),
                KeyCode::Left => field.left(),
                KeyCode::Right => field.right(),
                KeyCode::Home => field.home(),
                KeyCode::End => field.end(),
                _ => return,
            }
        }
    }
    app.mark_dirty();
}

/// Schedule the dialog's text at its frame. Blank text does nothing.
fn save(app: &mut App) {
    let Some(ed) = &app.editor else {
        return;
    };
    let Some(text) = ed.final_text() else {
        return;
    };
    let frame = ed.session.frame;
    let verb = if ed.session.is_edit() { "Updated" } else { "Added" };

    match app.director.schedule_prompt(frame, &text) {
        Ok(()) => {
            app.close_editor();
            app.set_status(format!("{} prompt at frame {}", verb, frame));
        }
        // The local entry stands; the next snapshot decides.
        Err(e @ DirectorError::Transport { .. }) => {
            app.close_editor();
            app.set_error(e.to_string());
        }
        Err(e) => app.set_error(e.to_string()),
    }
}

fn enhance(app: &mut App) {
    let Some(ed) = &app.editor else {
        return;
    };
    if !ed.can_enhance() {
        return;
    }
    let request = ed.enhance_request(app.director.schedule());
    let ticket = app.enhancer.request(request);
    if let Some(ed) = &mut app.editor {
        ed.enhancing = Some(ticket);
        ed.enhance_error = None;
    }
}

/// Local-only delete; offered for existing prompts past frame 0.
fn delete(app: &mut App) {
    let Some(ed) = &app.editor else {
        return;
    };
    if !ed.session.can_delete() {
        return;
    }
    let frame = ed.session.frame;
    app.director.delete_prompt(frame);
    info!("deleted prompt at frame {} from the timeline", frame);
    app.close_editor();
    app.set_status(format!(
        "Removed prompt at frame {} (the engine keeps it until reset)",
        frame
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::link::LinkEvent;
    use crate::model::{ConnectionStatus, DirectorConfig, EngineMessage, StateSnapshot};
    use crate::tui::app::{Mode, StatusKind};
    use crate::tui::editor::Field;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_editor(app, key(KeyCode::Char(c)));
        }
    }

    fn app_with(prompts: &[(u32, &str)]) -> App {
        let mut app = App::new(DirectorConfig::default());
        app.on_link_event(LinkEvent::Status(ConnectionStatus::Ready));
        app.on_link_event(LinkEvent::Message(EngineMessage::State(StateSnapshot {
            current_frame: 0,
            current_prompt: None,
            paused: true,
            scheduled_prompts: prompts.iter().map(|(f, t)| (*f, t.to_string())).collect(),
        })));
        app
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut app = app_with(&[]);
        app.open_editor_at(0);
        type_text(&mut app, "temple");
        handle_editor(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "misty");
        let ed = app.editor.as_ref().unwrap();
        assert_eq!(ed.prompt.text(), "temple");
        assert_eq!(ed.enhanced.text(), "misty");
        assert_eq!(ed.focus, Field::Enhanced);
    }

    #[test]
    fn blank_save_keeps_the_dialog_open() {
        let mut app = app_with(&[]);
        app.open_editor_at(5);
        type_text(&mut app, "   ");
        handle_editor(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Editor);
        assert!(app.director.schedule().is_empty());
    }

    #[test]
    fn save_writes_locally_even_if_the_send_fails() {
        // The link itself never connected, so the send fails.
        let mut app = app_with(&[]);
        app.open_editor_at(0);
        type_text(&mut app, "temple");
        handle_editor(&mut app, key(KeyCode::Enter));
        assert_eq!(app.director.schedule().get(0), Some("temple"));
        assert!(app.editor.is_none());
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn delete_is_refused_at_frame_zero() {
        let mut app = app_with(&[(0, "temple"), (60, "dragon")]);
        app.open_editor_at(0);
        handle_editor(&mut app, ctrl('d'));
        assert_eq!(app.mode, Mode::Editor);
        assert!(app.director.schedule().contains(0));

        app.close_editor();
        app.open_editor_at(61);
        handle_editor(&mut app, ctrl('d'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.director.schedule().contains(60));
    }

    #[test]
    fn enhance_needs_prompt_text() {
        let mut app = app_with(&[]);
        app.open_editor_at(10);
        handle_editor(&mut app, ctrl('e'));
        assert!(app.editor.as_ref().unwrap().enhancing.is_none());
    }

    #[test]
    fn escape_discards() {
        let mut app = app_with(&[]);
        app.open_editor_at(10);
        type_text(&mut app, "x");
        handle_editor(&mut app, key(KeyCode::Esc));
        assert!(app.editor.is_none());
        assert!(app.director.schedule().is_empty());
    }
}
