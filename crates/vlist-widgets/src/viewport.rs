#![forbid(unsafe_code)]

//! Viewport geometry and the scroll container that supplies it.

/// What the scroll container currently shows, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportGeometry {
    /// Distance from the top of the content to the top of the viewport.
    pub scroll_offset: u32,
    /// Visible height.
    pub viewport_height: u32,
    /// Visible width.
    pub viewport_width: u32,
}

impl ViewportGeometry {
    /// Create a geometry snapshot.
    #[must_use]
    pub const fn new(scroll_offset: u32, viewport_height: u32, viewport_width: u32) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            viewport_width,
        }
    }
}

/// Source of viewport geometry for a render pass.
///
/// A real host reports its scroll position and size; tests use
/// [`FixedViewport`].
pub trait ViewportProvider {
    /// Geometry to lay out against.
    fn geometry(&self) -> ViewportGeometry;
}

impl ViewportProvider for ViewportGeometry {
    fn geometry(&self) -> ViewportGeometry {
        *self
    }
}

/// A provider that always reports the same geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedViewport(pub ViewportGeometry);

impl FixedViewport {
    /// Fixed viewport at `scroll_offset` with the given size.
    #[must_use]
    pub const fn new(scroll_offset: u32, viewport_height: u32, viewport_width: u32) -> Self {
        Self(ViewportGeometry::new(
            scroll_offset,
            viewport_height,
            viewport_width,
        ))
    }
}

impl ViewportProvider for FixedViewport {
    fn geometry(&self) -> ViewportGeometry {
        self.0
    }
}

/// Scroll position over content of a known total height.
///
/// The offset always stays within `[0, max_offset()]` where
/// `max_offset = content_height - viewport_height` (saturating at 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    offset: u32,
    viewport_height: u32,
    viewport_width: u32,
    content_height: u32,
}

impl ScrollState {
    /// Scroll state at the top of the content.
    #[must_use]
    pub const fn new(viewport_height: u32, viewport_width: u32) -> Self {
        Self {
            offset: 0,
            viewport_height,
            viewport_width,
            content_height: 0,
        }
    }

    /// Current scroll offset.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Visible height.
    #[must_use]
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Total content height last reported.
    #[must_use]
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Largest valid offset.
    #[must_use]
    pub fn max_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Update the viewport size (e.g. on terminal resize).
    pub fn resize(&mut self, viewport_height: u32, viewport_width: u32) {
        self.viewport_height = viewport_height;
        self.viewport_width = viewport_width;
        self.clamp();
    }

    /// Update the content height (e.g. after the row count changed).
    pub fn set_content_height(&mut self, content_height: u32) {
        self.content_height = content_height;
        self.clamp();
    }

    /// Scroll by `delta` units; positive scrolls down.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = i64::from(self.offset)
            .saturating_add(delta)
            .clamp(0, i64::from(self.max_offset()));
        self.offset = target as u32;
    }

    /// Jump to an absolute offset (clamped).
    pub fn scroll_to(&mut self, offset: u32) {
        self.offset = offset.min(self.max_offset());
    }

    /// Scroll up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_by(-i64::from(self.viewport_height));
    }

    /// Scroll down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_by(i64::from(self.viewport_height));
    }

    /// Jump to the top.
    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    /// Jump to the bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl ViewportProvider for ScrollState {
    fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry::new(self.offset, self.viewport_height, self.viewport_width)
    }
}
