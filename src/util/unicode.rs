use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

fn grapheme_width(g: &str) -> usize {
    if g == "\t" {
        4
    } else {
        UnicodeWidthStr::width(g)
    }
}

fn is_blank(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Truncate to `max_cells` terminal cells, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Truncate or right-pad with spaces to exactly `cells` wide.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Byte offset of the grapheme after the one at `offset`, if any.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset >= s.len() {
        return None;
    }
    let step = s[offset..].graphemes(true).next().map_or(0, str::len);
    Some(offset + step)
}

/// Byte offset of the grapheme before `offset`, if any.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return None;
    }
    s[..offset].grapheme_indices(true).next_back().map(|(i, _)| i)
}

/// Start of the word left of `offset` (whitespace-delimited).
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let mut pos = offset.min(s.len());
    let mut seen_word = false;
    for (i, g) in s[..pos].grapheme_indices(true).rev() {
        if is_blank(g) {
            if seen_word {
                break;
            }
        } else {
            seen_word = true;
        }
        pos = i;
    }
    pos
}

/// Start of the next word right of `offset` (whitespace-delimited).
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let start = offset.min(s.len());
    let mut in_gap = false;
    for (i, g) in s[start..].grapheme_indices(true) {
        if is_blank(g) {
            in_gap = true;
        } else if in_gap {
            return start + i;
        }
    }
    s.len()
}

/// Display column of byte `offset`
pub fn offset_to_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

/// Word-wrap `s` into rows of at most `width` cells, as byte ranges.
///
/// Breaks after whitespace when possible; a token wider than a row is split
/// at grapheme boundaries. Always returns at least one (possibly empty) row.
pub fn wrap_ranges(s: &str, width: usize) -> Vec<Range<usize>> {
    if width == 0 || display_width(s) <= width {
        return vec![0..s.len()];
    }
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut row_width = 0;
    let mut last_break: Option<usize> = None;

    for (i, g) in s.grapheme_indices(true) {
        let gw = grapheme_width(g);
        if row_width + gw > width && i > row_start {
            let cut = match last_break {
                Some(b) if b > row_start => b,
                _ => i,
            };
            rows.push(row_start..cut);
            row_start = cut;
            row_width = display_width(&s[cut..i]);
            last_break = None;
        }
        row_width += gw;
        if is_blank(g) {
            last_break = Some(i + g.len());
        }
    }
    rows.push(row_start..s.len());
    rows
}
