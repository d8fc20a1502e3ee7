#![forbid(unsafe_code)]

//! Character-cell frame that widgets draw into.
//!
//! A [`Frame`] is a `width × height` grid of cells. Wide characters take two
//! cells; the second is stored as a continuation marker and skipped when a
//! line is read back.

use unicode_width::UnicodeWidthChar;

/// Continuation cell following a double-width character.
const WIDE_TAIL: char = '\0';

/// Axis-aligned rectangle in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin.
    #[must_use]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the last column.
    #[must_use]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row.
    #[must_use]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Split off the top `rows` rows; returns `(top, rest)`.
    #[must_use]
    pub fn split_top(&self, rows: u16) -> (Rect, Rect) {
        let rows = rows.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, rows),
            Rect::new(self.x, self.y + rows, self.width, self.height - rows),
        )
    }

    /// Split off the bottom `rows` rows; returns `(rest, bottom)`.
    #[must_use]
    pub fn split_bottom(&self, rows: u16) -> (Rect, Rect) {
        let (top, bottom) = self.split_top(self.height - rows.min(self.height));
        (top, bottom)
    }
}

/// Grid of character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl Frame {
    /// Blank frame.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; usize::from(width) * usize::from(height)],
        }
    }

    /// Frame width in cells.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in cells.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Whole-frame rectangle.
    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(' ');
    }

    /// Set one cell; ignored outside the frame.
    pub fn set(&mut self, x: u16, y: u16, ch: char) {
        if x < self.width && y < self.height {
            let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
            self.cells[idx] = ch;
        }
    }

    /// Cell at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        (x < self.width && y < self.height)
            .then(|| self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)])
    }

    /// Write `text` starting at `(x, y)`, clipped to `max_width` cells and
    /// the frame edge. Returns the number of cells written.
    pub fn print(&mut self, x: u16, y: u16, text: &str, max_width: u16) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = x.saturating_add(max_width).min(self.width);
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > limit {
                break;
            }
            self.set(col, y, ch);
            if w == 2 {
                self.set(col + 1, y, WIDE_TAIL);
            }
            col += w;
        }
        col - x
    }

    /// Row `y` as a string, with trailing blanks trimmed.
    #[must_use]
    pub fn line(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        let row = &self.cells[start..start + usize::from(self.width)];
        let text: String = row.iter().filter(|&&c| c != WIDE_TAIL).collect();
        text.trim_end().to_string()
    }

    /// Every row, trimmed.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.line(y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_clips_to_width() {
        let mut frame = Frame::new(10, 2);
        let written = frame.print(2, 0, "item 1000", 5);
        assert_eq!(written, 5);
        assert_eq!(frame.line(0), "  item");
        assert_eq!(frame.line(1), "");
    }

    #[test]
    fn print_outside_is_ignored() {
        let mut frame = Frame::new(4, 1);
        assert_eq!(frame.print(0, 3, "x", 4), 0);
        frame.set(9, 0, 'x');
        assert_eq!(frame.lines(), vec![String::new()]);
    }

    #[test]
    fn wide_chars_take_two_cells() {
        let mut frame = Frame::new(5, 1);
        assert_eq!(frame.print(0, 0, "日本語", 5), 4);
        assert_eq!(frame.line(0), "日本");
    }

    #[test]
    fn rect_splits() {
        let area = Rect::new(0, 0, 80, 24);
        let (header, rest) = area.split_top(3);
        assert_eq!(header, Rect::new(0, 0, 80, 3));
        let (list, status) = rest.split_bottom(1);
        assert_eq!(list, Rect::new(0, 3, 80, 20));
        assert_eq!(status, Rect::new(0, 23, 80, 1));
        assert_eq!(status.bottom(), 24);
        assert!(Rect::new(0, 0, 0, 5).is_empty());
    }
}
