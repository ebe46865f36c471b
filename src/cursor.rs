//! Active row and scroll window arithmetic for the container table.

/// Clamp the active row into `[0, row_count)` and move the scroll offset the
/// minimum distance needed to keep it inside a window of `height` rows.
///
/// Returns `(active, offset)`. With no rows both are 0.
pub fn clamp(active: usize, offset: usize, row_count: usize, height: usize) -> (usize, usize) {
    if row_count == 0 {
        return (0, 0);
    }

    let active = active.min(row_count - 1);
    let mut offset = offset;
    if active >= offset + height {
        offset = active + 1 - height;
    }
    if active < offset {
        offset = active;
    }
    (active, offset)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub active: usize,
    pub offset: usize,
}

impl Cursor {
    pub fn clamp(&mut self, row_count: usize, height: usize) {
        (self.active, self.offset) = clamp(self.active, self.offset, row_count, height);
    }

    pub fn move_down(&mut self, row_count: usize, height: usize) {
        self.active = self.active.saturating_add(1);
        self.clamp(row_count, height);
    }

    pub fn move_up(&mut self, row_count: usize, height: usize) {
        self.active = self.active.saturating_sub(1);
        self.clamp(row_count, height);
    }

    /// Whether row `idx` falls inside the scroll window.
    pub fn is_visible(&self, idx: usize, height: usize) -> bool {
        self.offset <= idx && idx < self.offset + height
    }

    /// Index range of rows inside the window, bounded by `row_count`.
    pub fn window(&self, row_count: usize, height: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(row_count);
        let end = (self.offset + height).min(row_count);
        start..end
    }
}
