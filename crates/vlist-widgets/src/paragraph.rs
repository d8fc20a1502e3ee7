#![forbid(unsafe_code)]

use crate::Widget;
use crate::frame::{Frame, Rect};

/// A widget that renders lines of plain text, one per row, clipped to its area.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    lines: Vec<String>,
}

impl Paragraph {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            lines: text.as_ref().lines().map(str::to_string).collect(),
        }
    }

    /// Append one more line.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

impl Widget for Paragraph {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Paragraph",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        for (row, text) in self.lines.iter().take(usize::from(area.height)).enumerate() {
            frame.print(area.x, area.y + row as u16, text, area.width);
        }
    }
}
