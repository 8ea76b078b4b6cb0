//! Rendering collaborator capability.
//!
//! The list never builds cell content itself. It asks a [`CellRenderer`]
//! for a handle and either gets one straight away or a promise that the
//! handle will be delivered later through
//! [`ListNode::complete_cell`](crate::ListNode::complete_cell).

use std::fmt;

/// Monotonic counter stamped on every cell creation request.
///
/// The cell cache advances it whenever indices stop meaning what they
/// meant, so results for requests issued before that point can be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Identifies one cell creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellTicket {
    /// Index the cell was requested for
    pub index: usize,
    /// Cache generation at request time
    pub generation: Generation,
}

impl CellTicket {
    pub const fn new(index: usize, generation: Generation) -> Self {
        Self { index, generation }
    }
}

/// Outcome of asking the renderer for a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creation<H> {
    /// The handle is ready now
    Ready(H),
    /// The handle will arrive later with the same ticket
    Deferred,
}

/// Produces renderable cell handles for items.
///
/// `create_cell` is required. `cell_retired` is optional: it is called once
/// for every handle the cache releases, so the renderer can recycle it.
pub trait CellRenderer<T, H> {
    /// Create (or start creating) the cell for `item` at `ticket.index`.
    fn create_cell(&self, item: &T, ticket: CellTicket) -> Creation<H>;

    /// A handle left the cache and will never be handed out again.
    fn cell_retired(&self, handle: &H) {
        let _ = handle;
    }
}
