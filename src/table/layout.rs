use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

use super::grid::display_width;

/// Horizontal placement of text inside a fixed-width block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Cut `s` so that it occupies at most `width` terminal columns
pub fn truncate(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Pad (or truncate) `s` to exactly `width` columns
pub fn fit(s: &str, width: usize, align: Align) -> String {
    let s = truncate(s, width);
    let fill = " ".repeat(width - display_width(s));
    match align {
        Align::Left => format!("{}{}", s, fill),
        Align::Right => format!("{}{}", fill, s),
    }
}

/// A fixed-width cell with one column of horizontal padding on each side
pub fn padded_cell(value: &str, width: usize, style: Style) -> Span<'static> {
    Span::styled(format!(" {} ", fit(value, width, Align::Left)), style)
}

/// Right-aligned label block, e.g. a row number
pub fn label(value: &str, width: usize, style: Style) -> Span<'static> {
    Span::styled(fit(value, width, Align::Right), style)
}

/// Horizontal rule drawn under a block of `width` columns
pub fn bottom_border(width: usize, style: Style) -> Span<'static> {
    Span::styled("─".repeat(width), style)
}
