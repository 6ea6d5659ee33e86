use ratatui::text::{Line, Span};

use crate::style::Theme;
use crate::table::grid::{ColumnWidths, Grid};
use crate::table::layout;
use crate::table::scroll::{self, OffsetUpdate, ScrollState};
use crate::table::viewport::Viewport;

/// Narrowest row-index label
const MIN_LABEL_WIDTH: usize = 2;

/// Scrollable, cursor-driven view over a loaded grid
#[derive(Debug, Clone)]
pub struct TableView {
    grid: Grid,
    widths: ColumnWidths,
    theme: Theme,

    // Cursor position
    cursor_row: usize,
    cursor_col: usize,

    // Rendered row window [start, end)
    start: usize,
    end: usize,

    viewport: Viewport,
}

impl TableView {
    /// Build the view and render its first frame. The viewport never gets
    /// taller than the grid has rows.
    pub fn new(grid: Grid, max_height: usize, theme: Theme) -> Self {
        let height = max_height.min(grid.row_count());
        let widths = ColumnWidths::compute(&grid);

        let mut view = Self {
            grid,
            widths,
            theme,
            cursor_row: 0,
            cursor_col: 0,
            start: 0,
            end: 0,
            viewport: Viewport::new(height),
        };
        view.update_viewport();
        view
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn height(&self) -> usize {
        self.viewport.height()
    }

    pub fn y_offset(&self) -> usize {
        self.viewport.y_offset()
    }

    /// Current (row, col), or `None` when there is nothing to select
    pub fn cursor(&self) -> Option<(usize, usize)> {
        if self.grid.row_count() == 0 {
            None
        } else {
            Some((self.cursor_row, self.cursor_col))
        }
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Rows currently rendered into the viewport buffer
    #[cfg(test)]
    pub fn window(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Rows actually on screen
    #[cfg(test)]
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        let range = self.viewport.visible_range();
        self.start + range.start..self.start + range.end
    }

    #[cfg(test)]
    pub fn selected_row(&self) -> Option<&[String]> {
        self.grid.get_row(self.cursor_row)
    }

    fn last_row(&self) -> usize {
        self.grid.row_count().saturating_sub(1)
    }

    fn last_col(&self) -> usize {
        self.grid.col_count().saturating_sub(1)
    }

    fn scroll_state(&self) -> ScrollState {
        ScrollState {
            cursor_row: self.cursor_row,
            row_count: self.grid.row_count(),
            start: self.start,
            end: self.end,
            offset: self.viewport.y_offset(),
            height: self.viewport.height(),
        }
    }

    fn apply(&mut self, update: OffsetUpdate) {
        match update {
            OffsetUpdate::Keep => {}
            OffsetUpdate::Set(n) => self.viewport.set_y_offset(n),
            OffsetUpdate::Jump(n) => self.viewport.scroll_to(n),
        }
    }

    // Navigation methods

    /// Move the cursor down by `n` rows, stopping at the last row
    pub fn move_down(&mut self, n: usize) {
        self.cursor_row = self.cursor_row.saturating_add(n).min(self.last_row());
        self.update_viewport();

        let update = scroll::resolve(scroll::DOWN_RULES, &self.scroll_state(), n);
        self.apply(update);
    }

    /// Move the cursor up by `n` rows, stopping at the first row
    pub fn move_up(&mut self, n: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(n).min(self.last_row());

        let update = scroll::resolve(scroll::UP_RULES, &self.scroll_state(), n);
        self.apply(update);
        self.update_viewport();
    }

    /// Move down by `pages` screens
    pub fn page_down(&mut self, pages: usize) {
        self.move_down(self.viewport.height().saturating_mul(pages));
    }

    /// Move up by `pages` screens
    pub fn page_up(&mut self, pages: usize) {
        self.move_up(self.viewport.height().saturating_mul(pages));
    }

    pub fn move_right(&mut self, n: usize) {
        self.cursor_col = self.cursor_col.saturating_add(n).min(self.last_col());
        self.update_viewport();
    }

    pub fn move_left(&mut self, n: usize) {
        self.cursor_col = self.cursor_col.saturating_sub(n).min(self.last_col());
        self.update_viewport();
    }

    // Rendering

    /// Recompute the rendered row window around the cursor and re-render it
    pub fn update_viewport(&mut self) {
        let height = self.viewport.height();
        self.start = self.cursor_row.saturating_sub(height);
        self.end = (self.cursor_row + height).clamp(self.cursor_row, self.grid.row_count());

        let rendered: Vec<Line<'static>> = (self.start..self.end).map(|r| self.render_row(r)).collect();
        self.viewport.set_content(rendered);
    }

    fn label_width(&self) -> usize {
        self.grid.row_count().to_string().len().max(MIN_LABEL_WIDTH)
    }

    /// Indices of the columns drawn: from the cursor column to the last one
    fn visible_cols(&self) -> std::ops::Range<usize> {
        self.cursor_col.min(self.grid.col_count())..self.grid.col_count()
    }

    /// Column titles on the first line, a bottom border on the second
    pub fn header_lines(&self) -> Vec<Line<'static>> {
        let label_width = self.label_width();
        let border = self.theme.border.to_ratatui();
        let header = self.theme.header.to_ratatui();

        let mut titles: Vec<Span<'static>> = Vec::with_capacity(self.grid.col_count() + 1);
        let mut rule: Vec<Span<'static>> = Vec::with_capacity(self.grid.col_count() + 1);

        titles.push(layout::label(" ", label_width, self.theme.header_label.to_ratatui()));
        rule.push(layout::bottom_border(label_width, border));

        for i in self.visible_cols() {
            let width = self.widths.get(i).unwrap_or(0);
            titles.push(layout::padded_cell(&self.grid.columns()[i], width, header));
            rule.push(layout::bottom_border(width + 2, border));
        }

        vec![Line::from(titles), Line::from(rule)]
    }

    /// One line for row `r`; the cursor row is drawn entirely in the
    /// highlight style
    fn render_row(&self, r: usize) -> Line<'static> {
        let (label_style, cell_style) = if r == self.cursor_row {
            (self.theme.highlight.to_ratatui(), self.theme.highlight.to_ratatui())
        } else {
            (self.theme.row_index.to_ratatui(), self.theme.cell.to_ratatui())
        };

        let mut spans: Vec<Span<'static>> = Vec::with_capacity(self.grid.col_count() + 1);
        spans.push(layout::label(&r.to_string(), self.label_width(), label_style));

        if let Some(row) = self.grid.get_row(r) {
            for i in self.visible_cols() {
                let value = row.get(i).map(String::as_str).unwrap_or("");
                let width = self.widths.get(i).unwrap_or(0);
                spans.push(layout::padded_cell(value, width, cell_style));
            }
        }

        Line::from(spans)
    }

    /// Header lines followed by the rows on screen
    pub fn view(&self) -> Vec<Line<'static>> {
        let mut lines = self.header_lines();
        lines.extend(self.viewport.visible_lines().iter().cloned());
        lines
    }

    /// Plain-text rendering of `view`
    #[cfg(test)]
    pub fn view_string(&self) -> String {
        self.view()
            .iter()
            .map(line_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Concatenated span contents of a line, without styling
#[cfg(test)]
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
