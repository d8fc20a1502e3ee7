#![forbid(unsafe_code)]

//! Windowed (virtualized) list renderer.
//!
//! [`WindowedList`] turns viewport geometry into a [`RowWindow`]: the rows
//! that intersect the viewport, widened by an overscan margin on both sides.
//! Only rows inside that window are handed to the [`RowFactory`], so render
//! cost follows the viewport size, not the list size. The reported total
//! height still covers every row so the scroll container behaves as if all
//! rows existed.
//!
//! # Invariants
//!
//! 1. `window.visible ⊆ window.rendered ⊆ 0..row_count`.
//! 2. Rendered rows come out in ascending index order with no gaps.
//! 3. An empty list yields an empty window and a total height of 0.
//! 4. Indices past the current row count are never built, even when a
//!    window computed for a longer list is replayed.

use std::ops::Range;

use crate::heights::{DEFAULT_ROW_HEIGHT, RowHeights};
use crate::row::{RenderedRow, RowFactory};
use crate::viewport::{ViewportGeometry, ViewportProvider};

/// Rows rendered beyond each viewport edge by default.
pub const DEFAULT_OVERSCAN: usize = 10;

/// Index ranges produced by one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowWindow {
    /// Rows intersecting the viewport.
    pub visible: Range<usize>,
    /// `visible` widened by overscan and clamped to the list.
    pub rendered: Range<usize>,
}

impl RowWindow {
    /// Whether nothing would be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }

    /// Number of rows that would be rendered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    /// First row intersecting the viewport.
    #[must_use]
    pub fn first_visible(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.visible.start)
    }

    /// Last row intersecting the viewport.
    #[must_use]
    pub fn last_visible(&self) -> Option<usize> {
        (!self.visible.is_empty()).then(|| self.visible.end - 1)
    }
}

/// Virtualized list layout state.
#[derive(Debug, Clone)]
pub struct WindowedList {
    heights: RowHeights,
    overscan: usize,
    window: RowWindow,
    recompute_count: u64,
}

impl Default for WindowedList {
    fn default() -> Self {
        Self::new(0, DEFAULT_ROW_HEIGHT)
    }
}

impl WindowedList {
    /// List of `row_count` rows of uniform `row_height`.
    #[must_use]
    pub fn new(row_count: usize, row_height: u32) -> Self {
        Self {
            heights: RowHeights::new(row_count, row_height),
            overscan: DEFAULT_OVERSCAN,
            window: RowWindow::default(),
            recompute_count: 0,
        }
    }

    /// Set the overscan margin.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.heights.row_count()
    }

    /// Overscan margin in rows.
    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Default (uniform) row height.
    #[must_use]
    pub fn row_height(&self) -> u32 {
        self.heights.default_height()
    }

    /// Height of the whole list as the scroll container should see it.
    #[must_use]
    pub fn total_height(&self) -> u32 {
        self.heights.total()
    }

    /// Window from the most recent render pass.
    #[must_use]
    pub fn window(&self) -> &RowWindow {
        &self.window
    }

    /// How many times [`recompute_row_heights`](Self::recompute_row_heights)
    /// has been called.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    /// Read-only access to the row-position table.
    #[must_use]
    pub fn heights(&self) -> &RowHeights {
        &self.heights
    }

    /// Change the number of rows. Positions are re-measured on the next pass.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.heights.set_row_count(row_count);
    }

    /// Discard cached row positions so the next pass re-measures every row.
    pub fn recompute_row_heights(&mut self) {
        self.heights.invalidate();
        self.recompute_count += 1;
        vlist_core::debug!(
            row_count = self.heights.row_count(),
            invocation = self.recompute_count,
            "row heights invalidated"
        );
    }

    /// Record a measured height for one row without a full rebuild.
    pub fn measure_row(&mut self, index: usize, height: u32) {
        self.heights.measure(index, height);
    }

    /// Rebuild row positions from `factory` if they are stale.
    pub fn prepare<F: RowFactory>(&mut self, factory: &F) {
        self.heights.ensure(|index| factory.row_height(index));
    }

    /// Window for `geometry` against the current row positions.
    ///
    /// Scroll offsets past the end are clamped to the last row.
    #[must_use]
    pub fn compute_window(&self, geometry: ViewportGeometry) -> RowWindow {
        let row_count = self.row_count();
        if row_count == 0 || geometry.viewport_height == 0 {
            return RowWindow::default();
        }
        let total = self.heights.total();
        let offset = geometry.scroll_offset.min(total.saturating_sub(1));
        let bottom = offset.saturating_add(geometry.viewport_height - 1);

        let first = self.heights.index_at(offset).unwrap_or(0);
        let last = self.heights.index_at(bottom).unwrap_or(first).max(first);

        let start = first.saturating_sub(self.overscan);
        let end = last
            .saturating_add(1)
            .saturating_add(self.overscan)
            .min(row_count);
        RowWindow {
            visible: first..last + 1,
            rendered: start..end,
        }
    }

    /// Lay out against `viewport` and build every row in the new window.
    pub fn render<V, F>(&mut self, viewport: &V, factory: &mut F) -> Vec<RenderedRow<F::Row>>
    where
        V: ViewportProvider + ?Sized,
        F: RowFactory,
    {
        let geometry = viewport.geometry();
        let _span = vlist_core::debug_span!(
            "window_render",
            rows = self.row_count(),
            offset = geometry.scroll_offset,
            height = geometry.viewport_height
        )
        .entered();

        self.prepare(factory);
        self.window = self.compute_window(geometry);
        let window = self.window.clone();
        self.rows_in(&window, factory)
    }

    /// Build the rows of `window`, skipping indices that no longer exist.
    ///
    /// `window` may come from an earlier pass over a longer list.
    pub fn rows_in<F: RowFactory>(
        &self,
        window: &RowWindow,
        factory: &mut F,
    ) -> Vec<RenderedRow<F::Row>> {
        let end = window.rendered.end.min(self.row_count());
        let start = window.rendered.start.min(end);
        (start..end)
            .filter_map(|index| {
                factory.build_row(index).map(|content| RenderedRow {
                    index,
                    top: self.heights.top(index),
                    height: self.heights.height(index),
                    content,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{FnRows, ItemRows};
    use crate::viewport::FixedViewport;
    use vlist_core::Item;

    fn thousand() -> WindowedList {
        WindowedList::new(1000, 60).with_overscan(10)
    }

    #[test]
    fn top_of_list_starts_at_zero() {
        let list = thousand();
        let window = list.compute_window(ViewportGeometry::new(0, 600, 300));
        assert_eq!(window.visible, 0..10);
        assert_eq!(window.rendered, 0..20);
        assert_eq!(window.first_visible(), Some(0));
    }

    #[test]
    fn row_hundred_renders_from_ninety() {
        let list = thousand();
        let window = list.compute_window(ViewportGeometry::new(6000, 600, 300));
        assert_eq!(window.first_visible(), Some(100));
        assert_eq!(window.last_visible(), Some(109));
        assert_eq!(window.rendered, 90..120);
    }

    #[test]
    fn window_brackets_the_scroll_offset() {
        let list = thousand();
        for offset in [0u32, 1, 59, 60, 61, 5999, 6001, 30_000, 59_939] {
            let window = list.compute_window(ViewportGeometry::new(offset, 600, 300));
            let first = window.first_visible().unwrap();
            let last = window.last_visible().unwrap();
            assert!(first as u32 * 60 <= offset, "offset {offset}");
            assert!(offset < (last as u32 + 1) * 60, "offset {offset}");
        }
    }

    #[test]
    fn end_of_list_is_clamped() {
        let list = thousand();
        let window = list.compute_window(ViewportGeometry::new(1_000_000, 600, 300));
        assert_eq!(window.visible, 999..1000);
        assert_eq!(window.rendered, 989..1000);
    }

    #[test]
    fn empty_list_renders_nothing() {
        let mut list = WindowedList::new(0, 60);
        let mut rows = FnRows(|i: usize| Some(i));
        let out = list.render(&FixedViewport::new(0, 600, 300), &mut rows);
        assert!(out.is_empty());
        assert_eq!(list.total_height(), 0);
        assert!(list.window().is_empty());
    }

    #[test]
    fn zero_height_viewport_renders_nothing() {
        let list = thousand();
        assert!(list.compute_window(ViewportGeometry::new(0, 0, 300)).is_empty());
    }

    #[test]
    fn factory_called_only_inside_window() {
        let mut list = thousand();
        let mut calls = Vec::new();
        let mut rows = FnRows(|i: usize| {
            calls.push(i);
            Some(i)
        });
        let out = list.render(&FixedViewport::new(6000, 600, 300), &mut rows);
        drop(rows);

        assert_eq!(calls, (90..120).collect::<Vec<_>>());
        let indices: Vec<usize> = out.iter().map(|r| r.index).collect();
        assert_eq!(indices, calls);
        assert_eq!(out[0].top, 5400);
        assert_eq!(out[0].height, 60);
        assert_eq!(list.total_height(), 60_000);
    }

    #[test]
    fn stale_window_skips_missing_rows() {
        let items: Vec<Item> = (1..=1000).map(Item::numbered).collect();
        let mut list = thousand();
        let mut rows = ItemRows::new(&items);
        list.render(&FixedViewport::new(59_400, 600, 300), &mut rows);
        let stale = list.window().clone();
        assert_eq!(stale.rendered, 980..1000);

        let shrunk = &items[..500];
        list.set_row_count(shrunk.len());
        let out = list.rows_in(&stale, &mut ItemRows::new(shrunk));
        assert!(out.is_empty());

        let tail = RowWindow {
            visible: 495..505,
            rendered: 490..510,
        };
        let out = list.rows_in(&tail, &mut ItemRows::new(shrunk));
        assert_eq!(out.last().map(|r| r.index), Some(499));
    }

    #[test]
    fn recompute_counts_and_marks_stale() {
        let mut list = thousand();
        let mut rows = FnRows(|i: usize| Some(i));
        list.render(&FixedViewport::new(0, 600, 300), &mut rows);
        assert!(!list.heights().is_stale());

        list.recompute_row_heights();
        assert_eq!(list.recompute_count(), 1);
        assert!(list.heights().is_stale());

        list.render(&FixedViewport::new(0, 600, 300), &mut rows);
        assert!(!list.heights().is_stale());
    }

    struct Tall;

    impl RowFactory for Tall {
        type Row = usize;

        fn build_row(&mut self, index: usize) -> Option<usize> {
            Some(index)
        }

        fn row_height(&self, index: usize) -> Option<u32> {
            (index % 2 == 1).then_some(120)
        }
    }

    #[test]
    fn measured_heights_shift_the_window() {
        // Even rows 60, odd rows 120: each pair spans 180.
        let mut list = WindowedList::new(100, 60).with_overscan(0);
        let out = list.render(&FixedViewport::new(1800, 180, 300), &mut Tall);
        let indices: Vec<usize> = out.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![20, 21]);
        assert_eq!(out[0].top, 1800);
        assert_eq!(out[1].height, 120);
        assert_eq!(list.total_height(), 50 * 180);
    }
}
