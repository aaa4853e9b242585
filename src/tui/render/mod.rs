pub mod header;
pub mod help_overlay;
pub mod preview;
pub mod prompt_editor;
pub mod status_row;
pub mod timeline;
pub mod transport_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Main render function: lays out the screen and dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // header | preview | transport | ruler | track | status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    preview::render_preview(frame, app, chunks[1]);
    transport_bar::render_transport_bar(frame, app, chunks[2]);

    // Ruler and track share one horizontal inset so their columns line up
    let ruler = chunks[3].inner(Margin::new(1, 0));
    let track = chunks[4].inner(Margin::new(1, 0));
    timeline::render_ruler(frame, app, ruler);
    timeline::render_track(frame, app, track);
    app.track_area = (track.width > 0).then_some(track);

    status_row::render_status_row(frame, app, chunks[5]);

    match app.mode {
        Mode::Editor => prompt_editor::render_prompt_editor(frame, app, area),
        Mode::Help => help_overlay::render_help_overlay(frame, app, area),
        Mode::Navigate => {}
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
pub(super) fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
