use ratatui::text::Line;

/// A fixed-height window over a buffer of rendered lines
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    height: usize,
    y_offset: usize,
    lines: Vec<Line<'static>>,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            y_offset: 0,
            lines: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Largest offset that still fills the window
    pub fn max_y_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    /// Replace the content buffer. An offset pointing past the last line
    /// snaps to the bottom.
    pub fn set_content(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
        if self.y_offset >= self.lines.len().max(1) {
            self.goto_bottom();
        }
    }

    /// Set the offset, clamped so the window stays filled
    pub fn set_y_offset(&mut self, n: usize) {
        self.y_offset = n.min(self.max_y_offset());
    }

    /// Set the offset without clamping it against the content
    pub fn scroll_to(&mut self, n: usize) {
        self.y_offset = n;
    }

    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_y_offset();
    }

    /// Index range of the content lines currently shown
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let top = self.y_offset.min(self.lines.len());
        let bottom = (self.y_offset + self.height).clamp(top, self.lines.len());
        top..bottom
    }

    pub fn visible_lines(&self) -> &[Line<'static>] {
        &self.lines[self.visible_range()]
    }
}
