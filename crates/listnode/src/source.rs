//! Data source and delegate capabilities.
//!
//! Required methods have no default body. Optional ones either have a no-op
//! default or return `Option`, where `None` means "not provided".

use listnode_core::{AppliedBatch, IndexPath, VisibleRange};

/// Supplies items when the list reloads.
pub trait ListDataSource<T> {
    /// Number of items in `section`.
    fn number_of_items_in_section(&self, section: usize) -> usize;

    /// The item at `path`.
    fn item_at(&self, path: IndexPath) -> T;

    /// Number of sections. `None` means a single section.
    fn number_of_sections(&self) -> Option<usize> {
        None
    }
}

/// Receives notifications about list changes. Every method is optional.
pub trait ListDelegate {
    /// The sequence was replaced wholesale and now holds `len` items.
    fn did_reload(&self, len: usize) {
        let _ = len;
    }

    /// A batch was applied.
    fn did_apply_batch(&self, applied: &AppliedBatch) {
        let _ = applied;
    }

    /// The visible range changed after a layout pass, scroll or mutation.
    fn did_change_visible_range(&self, range: &VisibleRange) {
        let _ = range;
    }
}
