//! Selection and scroll bookkeeping.
//!
//! `selection` and `y_scroll` index ranked positions; `x_scroll` is a codepoint index
//! into the query. One row is reserved for the query line, the rest hold candidates.

use core_text::width::str_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub selection: usize,
    pub y_scroll: usize,
    pub x_scroll: usize,
    pub rows: u16,
    pub cols: u16,
}

impl ViewState {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            selection: 0,
            y_scroll: 0,
            x_scroll: 0,
            rows,
            cols,
        }
    }

    /// Rows available to candidates.
    pub fn choices_lines(&self) -> usize {
        usize::from(self.rows).saturating_sub(1)
    }

    /// Window height used for scroll math; never zero so the selection always has a row.
    fn window(&self) -> usize {
        self.choices_lines().max(1)
    }

    pub fn reset(&mut self) {
        self.selection = 0;
        self.y_scroll = 0;
    }

    pub fn down(&mut self, count: usize) {
        if self.selection + 1 < count {
            self.selection += 1;
            if self.selection - self.y_scroll == self.window() {
                self.y_scroll += 1;
            }
        }
    }

    pub fn up(&mut self) {
        if self.selection > 0 {
            self.selection -= 1;
            if self.selection < self.y_scroll {
                self.y_scroll -= 1;
            }
        }
    }

    pub fn page_down(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let lines = self.window();
        if self.selection + lines < count {
            self.selection += lines;
            self.y_scroll = self.selection;
        } else {
            self.selection = count - 1;
        }
        self.keep_visible();
    }

    pub fn page_up(&mut self) {
        let lines = self.window();
        if self.selection > lines {
            self.selection -= lines;
            self.y_scroll = self.selection;
        } else {
            self.reset();
        }
    }

    pub fn home(&mut self) {
        self.reset();
    }

    pub fn end(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selection = count - 1;
        self.keep_visible();
    }

    /// New geometry; the selection stays on screen.
    pub fn resize(&mut self, cols: u16, rows: u16, count: usize) {
        self.cols = cols;
        self.rows = rows;
        self.clamp(count);
    }

    /// Pull the selection back inside `0..count` and the window around it.
    pub fn clamp(&mut self, count: usize) {
        if count == 0 {
            self.reset();
            return;
        }
        self.selection = self.selection.min(count - 1);
        self.keep_visible();
    }

    fn keep_visible(&mut self) {
        let lines = self.window();
        if self.selection < self.y_scroll {
            self.y_scroll = self.selection;
        }
        if self.selection - self.y_scroll >= lines {
            self.y_scroll = self.selection + 1 - lines;
        }
    }

    /// Scroll the query horizontally so the cursor column lies in `0..cols`. Returns the
    /// cursor column relative to the scrolled text.
    pub fn sync_x_scroll(&mut self, query: &core_text::Query) -> usize {
        let cursor = query.cursor();
        let cols = usize::from(self.cols).max(1);
        if cursor < self.x_scroll {
            self.x_scroll = cursor;
        }
        let mut col = str_width(query.slice(self.x_scroll, cursor));
        while col >= cols && self.x_scroll < cursor {
            self.x_scroll += 1;
            col = str_width(query.slice(self.x_scroll, cursor));
        }
        col
    }
}
