//! Data source and delegate doubles.

use listnode::{AppliedBatch, IndexPath, ListDataSource, ListDelegate, VisibleRange};
use std::cell::{Cell, RefCell};

/// Sectioned in-memory data source.
///
/// Contents can be swapped between reloads with [`SectionedSource::set`].
#[derive(Debug, Default)]
pub struct SectionedSource<T> {
    sections: RefCell<Vec<Vec<T>>>,
    reads: Cell<usize>,
}

impl<T: Clone> SectionedSource<T> {
    pub fn new(sections: Vec<Vec<T>>) -> Self {
        Self {
            sections: RefCell::new(sections),
            reads: Cell::new(0),
        }
    }

    pub fn set(&self, sections: Vec<Vec<T>>) {
        *self.sections.borrow_mut() = sections;
    }

    /// Number of `item_at` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl<T: Clone> ListDataSource<T> for SectionedSource<T> {
    fn number_of_sections(&self) -> Option<usize> {
        Some(self.sections.borrow().len())
    }

    fn number_of_items_in_section(&self, section: usize) -> usize {
        self.sections.borrow().get(section).map_or(0, Vec::len)
    }

    fn item_at(&self, path: IndexPath) -> T {
        self.reads.set(self.reads.get() + 1);
        self.sections.borrow()[path.section][path.item].clone()
    }
}

/// A delegate callback, as recorded by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateEvent {
    Reloaded(usize),
    BatchApplied { initial_len: usize, final_len: usize },
    VisibleRangeChanged { start: usize, end: usize },
}

#[derive(Debug, Default)]
pub struct RecordingDelegate {
    events: RefCell<Vec<DelegateEvent>>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: DelegateEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ListDelegate for RecordingDelegate {
    fn did_reload(&self, len: usize) {
        self.push(DelegateEvent::Reloaded(len));
    }

    fn did_apply_batch(&self, applied: &AppliedBatch) {
        self.push(DelegateEvent::BatchApplied {
            initial_len: applied.initial_len,
            final_len: applied.final_len,
        });
    }

    fn did_change_visible_range(&self, range: &VisibleRange) {
        self.push(DelegateEvent::VisibleRangeChanged {
            start: range.start,
            end: range.end,
        });
    }
}
