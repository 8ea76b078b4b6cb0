//! In-memory scroll surface.

use listnode::ScrollSurface;
use std::cell::{Cell, RefCell};

/// A recorded `set_content_offset` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetChange {
    pub offset: f32,
    pub animated: bool,
}

/// [`ScrollSurface`] that applies offsets immediately and logs them.
#[derive(Debug)]
pub struct RecordingSurface {
    offset: Cell<f32>,
    viewport: Cell<f32>,
    changes: RefCell<Vec<OffsetChange>>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(720.0)
    }
}

impl RecordingSurface {
    pub fn new(viewport: f32) -> Self {
        Self {
            offset: Cell::new(0.0),
            viewport: Cell::new(viewport),
            changes: RefCell::new(Vec::new()),
        }
    }

    /// Simulate the user scrolling; not recorded as a change.
    pub fn scroll_to(&self, offset: f32) {
        self.offset.set(offset);
    }

    pub fn set_viewport(&self, viewport: f32) {
        self.viewport.set(viewport);
    }

    /// Offsets the list asked for, in order.
    pub fn changes(&self) -> Vec<OffsetChange> {
        self.changes.borrow().clone()
    }

    pub fn last_change(&self) -> Option<OffsetChange> {
        self.changes.borrow().last().copied()
    }
}

impl ScrollSurface for RecordingSurface {
    fn content_offset(&self) -> f32 {
        self.offset.get()
    }

    fn set_content_offset(&self, offset: f32, animated: bool) {
        self.offset.set(offset);
        self.changes
            .borrow_mut()
            .push(OffsetChange { offset, animated });
    }

    fn viewport_extent(&self) -> f32 {
        self.viewport.get()
    }
}
