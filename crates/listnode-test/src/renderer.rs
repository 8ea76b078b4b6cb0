//! Renderer that records every call.

use listnode::{CellRenderer, CellTicket, Creation};
use std::cell::{Cell, RefCell};
use std::fmt;

/// Cell handle produced by [`RecordingRenderer`].
///
/// `id` is unique per creation, so two handles with the same id are the same
/// cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCell {
    pub id: u64,
    /// Index the cell was created for
    pub created_at: usize,
    /// `Debug` rendering of the item
    pub label: String,
}

/// How the renderer answers creation requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreationMode {
    /// Return the cell immediately
    #[default]
    Immediate,
    /// Queue the cell; deliver it later with [`RecordingRenderer::take_deferred`]
    Deferred,
}

/// [`CellRenderer`] that counts creations and remembers retired cells.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    mode: Cell<CreationMode>,
    next_id: Cell<u64>,
    requests: RefCell<Vec<CellTicket>>,
    deferred: RefCell<Vec<(CellTicket, TestCell)>>,
    retired: RefCell<Vec<TestCell>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deferred() -> Self {
        let renderer = Self::default();
        renderer.set_mode(CreationMode::Deferred);
        renderer
    }

    pub fn set_mode(&self, mode: CreationMode) {
        self.mode.set(mode);
    }

    /// Number of `create_cell` calls so far.
    pub fn creations(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Every ticket the renderer was asked for, in order.
    pub fn requests(&self) -> Vec<CellTicket> {
        self.requests.borrow().clone()
    }

    /// Indices requested so far, in order.
    pub fn requested_indices(&self) -> Vec<usize> {
        self.requests.borrow().iter().map(|t| t.index).collect()
    }

    /// Drain cells waiting for delivery.
    pub fn take_deferred(&self) -> Vec<(CellTicket, TestCell)> {
        std::mem::take(&mut *self.deferred.borrow_mut())
    }

    /// Cells released by the list.
    pub fn retired(&self) -> Vec<TestCell> {
        self.retired.borrow().clone()
    }

    pub fn retired_ids(&self) -> Vec<u64> {
        self.retired.borrow().iter().map(|c| c.id).collect()
    }

    pub fn reset_counts(&self) {
        self.requests.borrow_mut().clear();
        self.retired.borrow_mut().clear();
    }

    fn make_cell(&self, label: String, ticket: CellTicket) -> TestCell {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        TestCell {
            id,
            created_at: ticket.index,
            label,
        }
    }
}

impl<T: fmt::Debug> CellRenderer<T, TestCell> for RecordingRenderer {
    fn create_cell(&self, item: &T, ticket: CellTicket) -> Creation<TestCell> {
        self.requests.borrow_mut().push(ticket);
        let cell = self.make_cell(format!("{item:?}"), ticket);
        match self.mode.get() {
            CreationMode::Immediate => Creation::Ready(cell),
            CreationMode::Deferred => {
                self.deferred.borrow_mut().push((ticket, cell));
                Creation::Deferred
            }
        }
    }

    fn cell_retired(&self, handle: &TestCell) {
        self.retired.borrow_mut().push(handle.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use listnode::Generation;

    fn ticket(index: usize) -> CellTicket {
        CellTicket::new(index, Generation::default())
    }

    #[test]
    fn test_immediate_cells_have_unique_ids() {
        let r = RecordingRenderer::new();
        let Creation::Ready(a) = r.create_cell(&"a", ticket(0)) else {
            panic!("expected ready cell");
        };
        let Creation::Ready(b) = r.create_cell(&"b", ticket(1)) else {
            panic!("expected ready cell");
        };
        assert_ne!(a.id, b.id);
        assert_eq!(a.label, "\"a\"");
        assert_eq!(r.creations(), 2);
        assert_eq!(r.requested_indices(), vec![0, 1]);
    }

    #[test]
    fn test_deferred_cells_are_queued() {
        let r = RecordingRenderer::deferred();
        assert_eq!(r.create_cell(&1, ticket(4)), Creation::Deferred);
        let queued = r.take_deferred();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].0.index, 4);
        assert!(r.take_deferred().is_empty());
    }
}
