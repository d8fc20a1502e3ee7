#![forbid(unsafe_code)]

//! Row-position table for the windowed renderer.
//!
//! Rows default to a uniform height, in which case positions are plain
//! arithmetic. When a [`RowFactory`](crate::row::RowFactory) reports measured
//! heights, the table switches to a [`FenwickTree`] so offset lookups stay
//! O(log n).
//!
//! The table is rebuilt lazily: [`RowHeights::invalidate`] only marks it
//! stale, and the next [`RowHeights::ensure`] re-measures every row.

use crate::fenwick::FenwickTree;

/// Default row height in layout units.
pub const DEFAULT_ROW_HEIGHT: u32 = 60;

#[derive(Debug, Clone)]
enum Layout {
    Uniform,
    Measured(FenwickTree),
}

/// Cached row positions for `row_count` rows.
#[derive(Debug, Clone)]
pub struct RowHeights {
    default_height: u32,
    row_count: usize,
    layout: Layout,
    stale: bool,
}

impl RowHeights {
    /// Uniform table; `default_height` is clamped to at least 1.
    #[must_use]
    pub fn new(row_count: usize, default_height: u32) -> Self {
        Self {
            default_height: default_height.max(1),
            row_count,
            layout: Layout::Uniform,
            stale: true,
        }
    }

    /// Height used for rows without a measurement.
    #[must_use]
    pub fn default_height(&self) -> u32 {
        self.default_height
    }

    /// Number of rows the table describes.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Whether the next [`ensure`](Self::ensure) will re-measure.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Whether any row has a measured (non-default) height.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        matches!(self.layout, Layout::Measured(_))
    }

    /// Change the row count and mark the table stale.
    pub fn set_row_count(&mut self, row_count: usize) {
        if row_count != self.row_count {
            self.row_count = row_count;
            self.stale = true;
        }
    }

    /// Forget all positions; the next `ensure` rebuilds them.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Rebuild the table if stale, asking `measure` for each row's height.
    ///
    /// Returns `true` if a rebuild happened.
    pub fn ensure(&mut self, mut measure: impl FnMut(usize) -> Option<u32>) -> bool {
        if !self.stale {
            return false;
        }
        let mut heights: Option<Vec<u32>> = None;
        for index in 0..self.row_count {
            let Some(h) = measure(index) else {
                continue;
            };
            if let Some(values) = heights.as_mut() {
                values[index] = h;
            } else if h != self.default_height {
                let mut values = vec![self.default_height; self.row_count];
                values[index] = h;
                heights = Some(values);
            }
        }
        self.layout = match heights {
            Some(values) => Layout::Measured(FenwickTree::from_values(&values)),
            None => Layout::Uniform,
        };
        self.stale = false;
        true
    }

    /// Record a single measured height without a full rebuild.
    ///
    /// Ignored for out-of-range rows.
    pub fn measure(&mut self, index: usize, height: u32) {
        if index >= self.row_count {
            return;
        }
        if let Layout::Measured(tree) = &mut self.layout
            && tree.len() == self.row_count
        {
            tree.set(index, height);
            return;
        }
        if height == self.default_height && !self.is_measured() {
            return;
        }
        let mut values: Vec<u32> = (0..self.row_count).map(|i| self.height(i)).collect();
        values[index] = height;
        self.layout = Layout::Measured(FenwickTree::from_values(&values));
    }

    /// Height of row `index` (default height when out of range).
    #[must_use]
    pub fn height(&self, index: usize) -> u32 {
        match &self.layout {
            Layout::Measured(tree) if index < tree.len() => tree.get(index),
            _ => self.default_height,
        }
    }

    /// Top edge of row `index`.
    #[must_use]
    pub fn top(&self, index: usize) -> u32 {
        match &self.layout {
            Layout::Uniform => (index as u32).saturating_mul(self.default_height),
            Layout::Measured(_) if index == 0 => 0,
            Layout::Measured(tree) if index <= tree.len() => tree.prefix(index - 1),
            Layout::Measured(tree) => {
                let past_end = (index - tree.len()) as u32;
                tree.total()
                    .saturating_add(past_end.saturating_mul(self.default_height))
            }
        }
    }

    /// Sum of all row heights.
    #[must_use]
    pub fn total(&self) -> u32 {
        match &self.layout {
            Layout::Measured(tree) => tree.total(),
            Layout::Uniform => (self.row_count as u32).saturating_mul(self.default_height),
        }
    }

    /// Row containing `offset`, clamped to `[0, row_count - 1]`.
    ///
    /// Returns `None` only when there are no rows.
    #[must_use]
    pub fn index_at(&self, offset: u32) -> Option<usize> {
        if self.row_count == 0 {
            return None;
        }
        let last = self.row_count - 1;
        let index = match &self.layout {
            Layout::Measured(tree) => tree.find_prefix(offset).map_or(0, |i| i + 1),
            Layout::Uniform => (offset / self.default_height) as usize,
        };
        Some(index.min(last))
    }
}
