#![forbid(unsafe_code)]

//! Item list widget drawn through the windowed renderer.
//!
//! Each row occupies one terminal line. Layout happens in layout units
//! (`units_per_line` per line), so the same [`WindowedList`] math that a
//! pixel-based host would use drives the terminal view.

use vlist_core::Item;

use crate::StatefulWidget;
use crate::frame::{Frame, Rect};
use crate::row::ItemRows;
use crate::viewport::ScrollState;
use crate::window::WindowedList;

const SCROLL_TRACK: char = '│';
const SCROLL_THUMB: char = '█';

/// Scroll and layout state for [`VirtualList`].
#[derive(Debug, Clone)]
pub struct VirtualListState {
    /// Windowing state.
    pub list: WindowedList,
    /// Scroll position in layout units.
    pub scroll: ScrollState,
    rendered_rows: usize,
}

impl VirtualListState {
    /// Wrap a windowed list, starting at the top.
    #[must_use]
    pub fn new(list: WindowedList) -> Self {
        Self {
            list,
            scroll: ScrollState::default(),
            rendered_rows: 0,
        }
    }

    /// Layout units covered by one terminal line.
    #[must_use]
    pub fn units_per_line(&self) -> u32 {
        self.list.row_height()
    }

    /// Rows materialized by the last render.
    #[must_use]
    pub fn rendered_rows(&self) -> usize {
        self.rendered_rows
    }

    /// Scroll by whole lines; positive scrolls down.
    pub fn scroll_lines(&mut self, lines: i64) {
        self.scroll
            .scroll_by(lines.saturating_mul(i64::from(self.units_per_line())));
    }

    /// Scroll so row `index` sits at the top of the viewport, as far as the
    /// content allows.
    pub fn scroll_to_row(&mut self, index: usize) {
        let top = self.list.heights().top(index);
        self.scroll.scroll_to(top);
    }
}

/// Renders the visible slice of an item sequence.
#[derive(Debug, Clone, Copy)]
pub struct VirtualList<'a> {
    items: &'a [Item],
    show_scrollbar: bool,
}

impl<'a> VirtualList<'a> {
    /// List over `items`.
    #[must_use]
    pub fn new(items: &'a [Item]) -> Self {
        Self {
            items,
            show_scrollbar: true,
        }
    }

    /// Enable or disable the scrollbar column.
    #[must_use]
    pub fn show_scrollbar(mut self, show: bool) -> Self {
        self.show_scrollbar = show;
        self
    }
}

impl StatefulWidget for VirtualList<'_> {
    type State = VirtualListState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        if area.is_empty() {
            return;
        }
        let units = state.units_per_line();
        let mut rows = ItemRows::new(self.items);

        state.list.set_row_count(rows.len());
        state.list.prepare(&rows);
        state
            .scroll
            .resize(u32::from(area.height).saturating_mul(units), u32::from(area.width));
        state.scroll.set_content_height(state.list.total_height());

        let needs_scrollbar = self.show_scrollbar && state.scroll.max_offset() > 0;
        let content_width = if needs_scrollbar {
            area.width.saturating_sub(1)
        } else {
            area.width
        };

        let rendered = state.list.render(&state.scroll, &mut rows);
        state.rendered_rows = rendered.len();

        let offset = i64::from(state.scroll.offset());
        for row in &rendered {
            // Overscan rows are built but fall outside the drawable area.
            let line = (i64::from(row.top) - offset).div_euclid(i64::from(units));
            if line < 0 || line >= i64::from(area.height) {
                continue;
            }
            frame.print(area.x, area.y + line as u16, &row.content.text, content_width);
        }

        if needs_scrollbar {
            draw_scrollbar(frame, area, &state.scroll);
        }
    }
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, scroll: &ScrollState) {
    let x = area.right().saturating_sub(1);
    let track = u32::from(area.height);
    let content = u64::from(scroll.content_height().max(1));
    let thumb = (u64::from(track) * u64::from(scroll.viewport_height()) / content)
        .clamp(1, u64::from(track)) as u32;
    let travel = track - thumb;
    let pos = if scroll.max_offset() == 0 {
        0
    } else {
        (u64::from(travel) * u64::from(scroll.offset()) / u64::from(scroll.max_offset())) as u32
    };
    for i in 0..track {
        let ch = if i >= pos && i < pos + thumb {
            SCROLL_THUMB
        } else {
            SCROLL_TRACK
        };
        frame.set(x, area.y + i as u16, ch);
    }
}
