//! List harness: a [`ListNode`] wired to recording collaborators.

use crate::renderer::{RecordingRenderer, TestCell};
use crate::source::RecordingDelegate;
use crate::surface::RecordingSurface;
use listnode::{CellTicket, Completion, ListConfig, ListNode};
use std::fmt;
use std::rc::Rc;

/// Fixed-extent configuration used by [`ListHarness::new`].
///
/// Every item is 10 units tall; no overscan and no retention margin, so the
/// cached cells are exactly the visible ones.
pub fn tight_config() -> ListConfig {
    ListConfig::new()
        .with_estimated_extent(10.0)
        .with_overscan(0)
        .with_retention_margin(0)
}

/// `count` distinct labels, `"item0"` onwards.
pub fn numbered_items(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("item{i}")).collect()
}

/// Drives a [`ListNode`] with a [`RecordingRenderer`], a
/// [`RecordingSurface`] and a [`RecordingDelegate`].
pub struct ListHarness<T> {
    list: ListNode<T, TestCell>,
    renderer: Rc<RecordingRenderer>,
    surface: Rc<RecordingSurface>,
    delegate: Rc<RecordingDelegate>,
}

impl<T: fmt::Debug + PartialEq + 'static> ListHarness<T> {
    /// Harness with [`tight_config`] and a 100-unit viewport.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_config(tight_config(), 100.0, items)
    }

    pub fn with_config(config: ListConfig, viewport: f32, items: Vec<T>) -> Self {
        Self::build(config, RecordingRenderer::new(), viewport, items)
    }

    /// Harness whose renderer defers every creation.
    pub fn deferred(items: Vec<T>) -> Self {
        Self::build(tight_config(), RecordingRenderer::deferred(), 100.0, items)
    }

    fn build(config: ListConfig, renderer: RecordingRenderer, viewport: f32, items: Vec<T>) -> Self {
        let renderer = Rc::new(renderer);
        let surface = Rc::new(RecordingSurface::new(viewport));
        let delegate = Rc::new(RecordingDelegate::new());
        let mut list = ListNode::new(config);
        list.set_renderer(&renderer);
        list.set_surface(&surface);
        list.set_delegate(&delegate);
        list.set_items(items);
        Self {
            list,
            renderer,
            surface,
            delegate,
        }
    }

    pub fn list(&self) -> &ListNode<T, TestCell> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListNode<T, TestCell> {
        &mut self.list
    }

    pub fn renderer(&self) -> &Rc<RecordingRenderer> {
        &self.renderer
    }

    pub fn surface(&self) -> &Rc<RecordingSurface> {
        &self.surface
    }

    pub fn delegate(&self) -> &Rc<RecordingDelegate> {
        &self.delegate
    }

    // === Simulation ===

    /// Scroll the surface as a user would, then run a layout pass.
    pub fn scroll(&mut self, offset: f32) -> &mut Self {
        self.surface.scroll_to(offset);
        self.list.layout_pass();
        self
    }

    /// Resize the viewport, then run a layout pass.
    pub fn resize(&mut self, viewport: f32) -> &mut Self {
        self.surface.set_viewport(viewport);
        self.list.layout_pass();
        self
    }

    /// Deliver every queued deferred cell, returning each outcome.
    pub fn deliver_deferred(&mut self) -> Vec<(CellTicket, Completion)> {
        self.renderer
            .take_deferred()
            .into_iter()
            .map(|(ticket, cell)| (ticket, self.list.complete_cell(ticket, cell)))
            .collect()
    }

    // === Queries ===

    /// Id of the cached cell at `index`.
    pub fn cell_id(&self, index: usize) -> Option<u64> {
        self.list.cached_cell(index).map(|cell| cell.id)
    }

    /// Ids of cached cells for `0..len`, `None` where nothing is cached.
    pub fn cell_ids(&self) -> Vec<Option<u64>> {
        (0..self.list.len()).map(|i| self.cell_id(i)).collect()
    }

    pub fn creations(&self) -> usize {
        self.renderer.creations()
    }

    // === Assertions ===

    /// Assert the visible range is `start..end`.
    pub fn assert_visible(&self, start: usize, end: usize) -> &Self {
        let range = self
            .list
            .visible_range()
            .map(listnode::VisibleRange::visible_range);
        assert_eq!(
            range,
            Some(start..end),
            "Expected visible range {start}..{end}, got {range:?}"
        );
        self
    }

    /// Assert the cell at `index` is the one with `id`.
    pub fn assert_cell(&self, index: usize, id: u64) -> &Self {
        let actual = self.cell_id(index);
        assert_eq!(
            actual,
            Some(id),
            "Expected cell {id} at index {index}, got {actual:?}"
        );
        self
    }

    pub fn assert_creations(&self, expected: usize) -> &Self {
        let actual = self.creations();
        assert_eq!(
            actual, expected,
            "Expected {expected} cell creations, got {actual}"
        );
        self
    }
}
