use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::link::LinkEvent;
use crate::model::{ConnectionStatus, DirectorConfig, EngineMessage, StateSnapshot};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen for `app`.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _| super::render(frame, app))
}

/// A disconnected app with default config.
pub fn offline_app() -> App {
    App::new(DirectorConfig::default())
}

/// A connected app that has received one snapshot.
pub fn app_with(current_frame: u32, prompts: &[(u32, &str)]) -> App {
    app_with_snapshot(current_frame, false, prompts)
}

pub fn app_with_snapshot(current_frame: u32, paused: bool, prompts: &[(u32, &str)]) -> App {
    let mut app = offline_app();
    app.on_link_event(LinkEvent::Status(ConnectionStatus::Ready));
    app.on_link_event(LinkEvent::Message(EngineMessage::State(StateSnapshot {
        current_frame,
        current_prompt: None,
        paused,
        scheduled_prompts: prompts.iter().map(|(f, t)| (*f, t.to_string())).collect(),
    })));
    app.status = None;
    app
}
