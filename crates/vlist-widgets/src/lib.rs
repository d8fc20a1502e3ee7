#![forbid(unsafe_code)]

//! Windowed list rendering for vlist.
//!
//! The core piece is [`WindowedList`]: given viewport geometry from a
//! [`ViewportProvider`] it decides which rows intersect the viewport, pads
//! that range with overscan, and asks a [`RowFactory`] for only those rows.
//! [`VirtualList`] wraps it as a terminal widget.

pub mod fenwick;
pub mod frame;
pub mod heights;
pub mod list;
pub mod paragraph;
pub mod row;
pub mod viewport;
pub mod window;

pub use frame::{Frame, Rect};
pub use heights::{DEFAULT_ROW_HEIGHT, RowHeights};
pub use list::{VirtualList, VirtualListState};
pub use paragraph::Paragraph;
pub use row::{FnRows, ItemRows, RenderedRow, RowFactory};
pub use viewport::{FixedViewport, ScrollState, ViewportGeometry, ViewportProvider};
pub use window::{DEFAULT_OVERSCAN, RowWindow, WindowedList};

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a [`Frame`] within a given [`Rect`].
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A `StatefulWidget` is a widget that renders based on mutable state.
pub trait StatefulWidget {
    type State;

    /// Render the widget into the frame with mutable state.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}
