//! Ordered scroll rules for vertical movement.
//!
//! Each table is evaluated top to bottom and the first rule whose condition
//! holds decides how the viewport offset changes. Arithmetic is signed so the
//! intermediate `offset - n` values behave like the clamps they feed.

/// Inputs the scroll rules look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub cursor_row: usize,
    pub row_count: usize,
    pub start: usize,
    pub end: usize,
    pub offset: usize,
    pub height: usize,
}

/// How a rule changes the viewport offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetUpdate {
    /// Leave the offset alone
    Keep,
    /// Set the offset, clamped by the viewport to its content
    Set(usize),
    /// Set the offset as-is
    Jump(usize),
}

pub struct ScrollRule {
    pub name: &'static str,
    applies: fn(&ScrollState, isize) -> bool,
    update: fn(&ScrollState, isize) -> OffsetUpdate,
}

fn clamp(v: isize, low: isize, high: isize) -> isize {
    v.max(low).min(high)
}

fn to_offset(v: isize) -> usize {
    v.max(0) as usize
}

impl ScrollState {
    fn cursor(&self) -> isize {
        self.cursor_row as isize
    }

    fn off(&self) -> isize {
        self.offset as isize
    }

    fn h(&self) -> isize {
        self.height as isize
    }
}

/// Rules applied after the cursor moved down and the window was recomputed
pub const DOWN_RULES: &[ScrollRule] = &[
    ScrollRule {
        name: "window reaches last row",
        applies: |s, _| s.end == s.row_count && s.offset > 0,
        update: |s, n| OffsetUpdate::Set(to_offset(clamp(s.off() - n, 1, s.h()))),
    },
    ScrollRule {
        name: "cursor past window midpoint",
        applies: |s, _| s.cursor_row > (s.end - s.start) / 2 && s.offset > 0,
        update: |s, n| OffsetUpdate::Set(to_offset(clamp(s.off() - n, 1, s.cursor()))),
    },
    ScrollRule {
        name: "hold scrolled offset",
        applies: |s, _| s.offset > 1,
        update: |_, _| OffsetUpdate::Keep,
    },
    ScrollRule {
        name: "cursor below visible window",
        applies: |s, _| s.cursor() > s.off() + s.h() - 1,
        update: |s, _| OffsetUpdate::Set(to_offset(clamp(s.off() + 1, 0, 1))),
    },
];

/// Rules applied after the cursor moved up, before the window is recomputed
pub const UP_RULES: &[ScrollRule] = &[
    ScrollRule {
        name: "window at top of content",
        applies: |s, _| s.start == 0,
        update: |s, _| OffsetUpdate::Set(to_offset(clamp(s.off(), 0, s.cursor()))),
    },
    ScrollRule {
        name: "window within first page",
        applies: |s, _| s.start < s.height,
        update: |s, n| {
            OffsetUpdate::Jump(to_offset(clamp(clamp(s.off() + n, 0, s.cursor()), 0, s.h())))
        },
    },
    ScrollRule {
        name: "scrolled window",
        applies: |s, _| s.offset >= 1,
        update: |s, n| OffsetUpdate::Jump(to_offset(clamp(s.off() + n, 1, s.h()))),
    },
];

/// First matching rule wins; no match keeps the offset
pub fn resolve(rules: &[ScrollRule], state: &ScrollState, n: usize) -> OffsetUpdate {
    let n = n as isize;
    rules
        .iter()
        .find(|rule| (rule.applies)(state, n))
        .map(|rule| {
            tracing::trace!(rule = rule.name, "scroll rule matched");
            (rule.update)(state, n)
        })
        .unwrap_or(OffsetUpdate::Keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cursor_row: usize, start: usize, end: usize, offset: usize) -> ScrollState {
        ScrollState {
            cursor_row,
            row_count: 100,
            start,
            end,
            offset,
            height: 10,
        }
    }

    #[test]
    fn down_window_at_last_row_pulls_offset_back() {
        let s = ScrollState { row_count: 20, ..state(15, 5, 20, 6) };
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Set(5));
        // never below one row of leading margin
        assert_eq!(resolve(DOWN_RULES, &s, 10), OffsetUpdate::Set(1));
    }

    #[test]
    fn down_window_at_last_row_caps_at_height() {
        let s = ScrollState { row_count: 20, ..state(15, 5, 20, 30) };
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Set(10));
    }

    #[test]
    fn down_last_row_rule_needs_positive_offset() {
        // offset 0 skips the first two rules and the hold rule
        let s = ScrollState { row_count: 20, ..state(15, 5, 20, 0) };
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Set(1));
    }

    #[test]
    fn down_cursor_past_midpoint() {
        let s = state(12, 2, 22, 4);
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Set(3));
        assert_eq!(resolve(DOWN_RULES, &s, 9), OffsetUpdate::Set(1));
    }

    #[test]
    fn down_hold_band() {
        // cursor not past midpoint, offset above one
        let s = state(3, 0, 13, 2);
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Keep);
    }

    #[test]
    fn down_cursor_below_window_scrolls_one_row() {
        let s = state(10, 0, 20, 0);
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Set(1));
    }

    #[test]
    fn down_cursor_inside_window_keeps_offset() {
        let s = state(5, 0, 15, 0);
        assert_eq!(resolve(DOWN_RULES, &s, 1), OffsetUpdate::Keep);
    }

    #[test]
    fn up_at_top_of_content_bounds_offset_by_cursor() {
        let s = state(3, 0, 13, 7);
        assert_eq!(resolve(UP_RULES, &s, 1), OffsetUpdate::Set(3));
        let s = state(5, 0, 15, 1);
        assert_eq!(resolve(UP_RULES, &s, 1), OffsetUpdate::Set(1));
    }

    #[test]
    fn up_within_first_page() {
        let s = state(8, 4, 24, 3);
        assert_eq!(resolve(UP_RULES, &s, 1), OffsetUpdate::Jump(4));
        // bounded by the cursor row
        let s = state(2, 4, 24, 3);
        assert_eq!(resolve(UP_RULES, &s, 5), OffsetUpdate::Jump(2));
        // and by the height
        let s = state(40, 9, 29, 8);
        assert_eq!(resolve(UP_RULES, &s, 5), OffsetUpdate::Jump(10));
    }

    #[test]
    fn up_scrolled_window() {
        let s = state(30, 20, 40, 2);
        assert_eq!(resolve(UP_RULES, &s, 1), OffsetUpdate::Jump(3));
        assert_eq!(resolve(UP_RULES, &s, 50), OffsetUpdate::Jump(10));
    }

    #[test]
    fn up_deep_window_without_offset_keeps() {
        let s = state(30, 20, 40, 0);
        assert_eq!(resolve(UP_RULES, &s, 1), OffsetUpdate::Keep);
    }
}
