use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::ops::hit_test::pointer_x_to_frame;
use crate::tui::app::{App, Mode};

/// Frame under terminal cell (`column`, `row`), if it is on the track
pub fn frame_at(app: &App, column: u16, row: u16) -> Option<u32> {
    let area = app.track_area?;
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let px = f64::from(column - area.x);
    Some(pointer_x_to_frame(px, f64::from(area.width), app.max_frames()))
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate {
        return;
    }
    let frame = frame_at(app, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved => {
            if frame != app.hover_frame {
                app.hover_frame = frame;
                app.mark_dirty();
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(f) = frame {
                app.open_editor_at(f);
            }
        }
        MouseEventKind::ScrollUp if frame.is_some() => {
            app.move_cursor_to(app.cursor_frame.saturating_sub(1));
        }
        MouseEventKind::ScrollDown if frame.is_some() => {
            app.move_cursor_to(app.cursor_frame.saturating_add(1));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    use super::*;
    use crate::io::link::LinkEvent;
    use crate::model::{ConnectionStatus, DirectorConfig, EngineMessage, StateSnapshot};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_on_track() -> App {
        let mut app = App::new(DirectorConfig::default());
        app.track_area = Some(Rect::new(2, 10, 80, 3));
        app
    }

    #[test]
    fn columns_map_to_frames() {
        let app = app_on_track();
        assert_eq!(frame_at(&app, 2, 10), Some(0));
        assert_eq!(frame_at(&app, 42, 11), Some(120));
        assert_eq!(frame_at(&app, 81, 12), Some(237));
        assert_eq!(frame_at(&app, 1, 10), None);
        assert_eq!(frame_at(&app, 42, 13), None);
    }

    #[test]
    fn hover_tracks_the_pointer() {
        let mut app = app_on_track();
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 12, 10));
        assert_eq!(app.hover_frame, Some(30));
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 12, 2));
        assert_eq!(app.hover_frame, None);
    }

    #[test]
    fn click_near_marker_edits_it() {
        let mut app = app_on_track();
        app.on_link_event(LinkEvent::Status(ConnectionStatus::Ready));
        app.on_link_event(LinkEvent::Message(EngineMessage::State(StateSnapshot {
            current_frame: 0,
            current_prompt: None,
            paused: true,
            scheduled_prompts: [(0, "temple".to_string()), (30, "dragon".to_string())]
                .into_iter()
                .collect(),
        })));
        // Column 13 → frame 33, within tolerance of 30
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 13, 11));
        let ed = app.editor.as_ref().unwrap();
        assert!(ed.session.is_edit());
        assert_eq!(ed.session.frame, 30);
    }
}
