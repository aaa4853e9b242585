//! The ruler and the prompt track.
//!
//! Both draw straight into the frame buffer, one cell per column, using
//! [`frame_to_column`] so that markers, segments and the playhead agree with
//! mouse hit testing.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::ops::hit_test::frame_to_column;
use crate::ops::resolve;
use crate::ops::timecode;
use crate::tui::app::App;
use crate::util::unicode;

const MARKER: &str = "\u{25C6}";
const PLAYHEAD: &str = "\u{25B2}";
const CURSOR: &str = "\u{25B3}";
const HOVER: &str = "\u{2502}";

/// Label positions on a ruler `width` cells wide: (column, label).
/// A label is skipped when it would touch the previous one or run off
/// the end.
pub fn ruler_labels(max_frames: u32, interval: u32, width: u16) -> Vec<(u16, String)> {
    let mut out = Vec::new();
    let mut next_free = 0u16;
    for tick in timecode::ruler_ticks(max_frames, interval) {
        let col = frame_to_column(tick, width, max_frames);
        let label = tick.to_string();
        let end = col as usize + label.len();
        if col < next_free || end > width as usize {
            continue;
        }
        next_free = end as u16 + 1;
        out.push((col, label));
    }
    out
}

pub fn render_ruler(frame: &mut Frame, app: &App, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let tl = app.director.timeline();
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let buf = frame.buffer_mut();

    for (col, label) in ruler_labels(tl.max_frames, tl.tick_interval, area.width) {
        buf.set_string(area.x + col, area.y, label, dim);
    }
    if area.height < 2 {
        return;
    }
    let y = area.y + 1;
    for x in 0..area.width {
        buf.set_string(area.x + x, y, "\u{2500}", dim);
    }
    for tick in timecode::ruler_ticks(tl.max_frames, tl.tick_interval) {
        let col = frame_to_column(tick, area.width, tl.max_frames);
        buf.set_string(area.x + col, y, "\u{252C}", dim);
    }
}

/// Three rows: markers (and hover), segments, playhead and cursor.
pub fn render_track(frame: &mut Frame, app: &App, area: Rect) {
    if area.width == 0 || area.height < 3 {
        return;
    }
    let max = app.max_frames();
    let bg = app.theme.background;
    let schedule = app.director.schedule();
    let current = app.director.current_frame();
    let active = resolve::active_frame(schedule, current);
    let col_of = |f: u32| area.x + frame_to_column(f, area.width, max);
    let (marker_y, bar_y, head_y) = (area.y, area.y + 1, area.y + 2);
    let buf = frame.buffer_mut();

    // Uncovered stretch before the first prompt
    for x in area.x..area.x + area.width {
        buf.set_string(x, bar_y, "\u{00B7}", Style::default().fg(app.theme.dim).bg(bg));
    }

    for (i, seg) in schedule.segments(max).iter().enumerate() {
        let is_active = active == Some(seg.start);
        let color = if is_active {
            app.theme.highlight
        } else {
            app.theme.segment_color(i)
        };
        let start = col_of(seg.start);
        let end = col_of(seg.end.saturating_sub(1).max(seg.start));
        let fill = Style::default().fg(bg).bg(color);
        for x in start..=end {
            buf.set_string(x, bar_y, " ", fill);
        }
        let room = (end - start) as usize;
        if room >= 2 {
            let label = unicode::truncate_to_width(seg.text, room);
            let style = if is_active {
                fill.add_modifier(Modifier::BOLD)
            } else {
                fill
            };
            buf.set_string(start + 1, bar_y, label, style);
        }

        let marker_style = if is_active {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(color).bg(bg)
        };
        buf.set_string(start, marker_y, MARKER, marker_style);
    }

    if let Some(hover) = app.hover_frame {
        let x = col_of(hover);
        if buf[(x, marker_y)].symbol() == " " {
            buf.set_string(x, marker_y, HOVER, Style::default().fg(app.theme.dim).bg(bg));
        }
    }

    let cursor_x = col_of(app.cursor_frame);
    buf.set_string(
        cursor_x,
        head_y,
        CURSOR,
        Style::default().fg(app.theme.cyan).bg(bg),
    );
    let head_x = col_of(current);
    buf.set_string(
        head_x,
        head_y,
        PLAYHEAD,
        Style::default().fg(app.theme.playhead).bg(bg),
    );
}
