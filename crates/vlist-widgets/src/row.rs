#![forbid(unsafe_code)]

//! Row content capability for the windowed renderer.

use vlist_core::Item;

/// Maps a row index to row content.
///
/// The renderer calls [`build_row`](Self::build_row) only for indices in the
/// current window. Returning `None` means "render nothing for this row",
/// which is how stale indices past the end of a shrunk list are handled.
pub trait RowFactory {
    /// Materialized row content.
    type Row;

    /// Build the row at `index`.
    fn build_row(&mut self, index: usize) -> Option<Self::Row>;

    /// Measured height of row `index`, or `None` to use the default.
    fn row_height(&self, _index: usize) -> Option<u32> {
        None
    }
}

/// A row the renderer materialized, with its layout position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow<R> {
    /// Index into the visible item sequence.
    pub index: usize,
    /// Top edge in layout units.
    pub top: u32,
    /// Height in layout units.
    pub height: u32,
    /// Content produced by the factory.
    pub content: R,
}

/// Rows backed by a slice of visible items.
#[derive(Debug, Clone, Copy)]
pub struct ItemRows<'a> {
    items: &'a [Item],
}

impl<'a> ItemRows<'a> {
    /// Rows for `items`, one per item, in order.
    #[must_use]
    pub fn new(items: &'a [Item]) -> Self {
        Self { items }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> RowFactory for ItemRows<'a> {
    type Row = &'a Item;

    fn build_row(&mut self, index: usize) -> Option<&'a Item> {
        self.items.get(index)
    }
}

/// Adapter turning a closure into a [`RowFactory`].
pub struct FnRows<F>(pub F);

impl<F, R> RowFactory for FnRows<F>
where
    F: FnMut(usize) -> Option<R>,
{
    type Row = R;

    fn build_row(&mut self, index: usize) -> Option<R> {
        (self.0)(index)
    }
}
