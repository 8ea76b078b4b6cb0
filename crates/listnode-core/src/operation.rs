//! Structural edits to an item sequence.
//!
//! An [`Operation`] is pure data. Its indices are only meaningful relative to
//! the length of the sequence at the moment it is applied, which inside a
//! [`Batch`](crate::Batch) is the *running* length left by the operations
//! before it.

use crate::error::{ListError, Result};
use std::fmt;
use std::ops::Range;

/// Discriminant of an [`Operation`], used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Delete,
    Move,
    Replace,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Replace => "replace",
        };
        f.write_str(name)
    }
}

/// One structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<T> {
    /// Insert `items` so that the first one lands at `at`.
    Insert {
        /// Destination index, `<= len`
        at: usize,
        /// Items to insert, in order
        items: Vec<T>,
    },
    /// Remove `count` items starting at `at`.
    Delete {
        /// First removed index
        at: usize,
        /// Number of items removed
        count: usize,
    },
    /// Move the block `[from, from + count)` so it starts at `to`.
    ///
    /// `to` is an index into the sequence with the block already taken out.
    Move {
        /// First moved index
        from: usize,
        /// Number of items moved
        count: usize,
        /// Destination in the sequence without the block
        to: usize,
    },
    /// Overwrite the items starting at `at` in place.
    Replace {
        /// First replaced index
        at: usize,
        /// Replacement items
        items: Vec<T>,
    },
}

impl<T> Operation<T> {
    /// Create an insert operation.
    pub fn insert(at: usize, items: impl IntoIterator<Item = T>) -> Self {
        Self::Insert {
            at,
            items: items.into_iter().collect(),
        }
    }

    /// Create a delete operation.
    pub const fn delete(at: usize, count: usize) -> Self {
        Self::Delete { at, count }
    }

    /// Create a move operation.
    pub const fn move_items(from: usize, count: usize, to: usize) -> Self {
        Self::Move { from, count, to }
    }

    /// Create a replace operation.
    pub fn replace(at: usize, items: impl IntoIterator<Item = T>) -> Self {
        Self::Replace {
            at,
            items: items.into_iter().collect(),
        }
    }

    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Insert { .. } => OperationKind::Insert,
            Self::Delete { .. } => OperationKind::Delete,
            Self::Move { .. } => OperationKind::Move,
            Self::Replace { .. } => OperationKind::Replace,
        }
    }

    /// The index the operation starts at (`from` for moves).
    pub const fn index(&self) -> usize {
        match self {
            Self::Insert { at, .. } | Self::Delete { at, .. } | Self::Replace { at, .. } => *at,
            Self::Move { from, .. } => *from,
        }
    }

    /// Number of items the operation touches.
    pub fn count(&self) -> usize {
        match self {
            Self::Insert { items, .. } | Self::Replace { items, .. } => items.len(),
            Self::Delete { count, .. } | Self::Move { count, .. } => *count,
        }
    }

    /// Change in sequence length caused by this operation.
    pub fn length_delta(&self) -> isize {
        match self {
            Self::Insert { items, .. } => items.len() as isize,
            Self::Delete { count, .. } => 0isize.saturating_sub_unsigned(*count),
            Self::Move { .. } | Self::Replace { .. } => 0,
        }
    }

    /// True when applying the operation cannot change the sequence.
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Move { from, count, to } => *count == 0 || from == to,
            _ => self.count() == 0,
        }
    }

    /// Range of source indices the operation reads or removes.
    pub fn source_range(&self) -> Range<usize> {
        let start = self.index();
        match self {
            Self::Insert { .. } => start..start,
            _ => start..start.saturating_add(self.count()),
        }
    }

    /// Check the operation against a running length.
    ///
    /// Returns the length after the operation. `position` is the
    /// operation's place in its batch and is only used for the error.
    pub fn check(&self, position: usize, len: usize) -> Result<usize> {
        let fits = match self {
            Self::Insert { at, .. } => *at <= len,
            Self::Delete { at, count } => *at <= len && *count <= len - at,
            Self::Replace { at, items } => *at <= len && items.len() <= len - at,
            Self::Move { from, count, to } => {
                *from <= len && *count <= len - from && *to <= len - count
            }
        };
        if !fits {
            return Err(ListError::OutOfRange {
                position,
                kind: self.kind(),
                index: self.index(),
                count: self.count(),
                len,
            });
        }
        Ok(len.saturating_add_signed(self.length_delta()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::INVALID_INDEX;

    #[test]
    fn test_insert_accessors() {
        let op = Operation::insert(3, ["a", "b"]);
        assert_eq!(op.kind(), OperationKind::Insert);
        assert_eq!(op.index(), 3);
        assert_eq!(op.count(), 2);
        assert_eq!(op.length_delta(), 2);
        assert_eq!(op.source_range(), 3..3);
    }

    #[test]
    fn test_delete_accessors() {
        let op = Operation::<()>::delete(1, 4);
        assert_eq!(op.kind(), OperationKind::Delete);
        assert_eq!(op.length_delta(), -4);
        assert_eq!(op.source_range(), 1..5);
    }

    #[test]
    fn test_invalid_sentinel_helpers_saturate() {
        let op = Operation::<()>::delete(INVALID_INDEX, 1);
        assert_eq!(op.source_range(), INVALID_INDEX..INVALID_INDEX);
        assert_eq!(
            Operation::<()>::move_items(INVALID_INDEX, 2, 0).source_range(),
            INVALID_INDEX..INVALID_INDEX
        );
        assert_eq!(Operation::<()>::delete(0, usize::MAX).length_delta(), isize::MIN);
        assert!(op.check(0, 5).is_err());
    }

    #[test]
    fn test_empty_insert_is_noop() {
        let op = Operation::<u8>::insert(0, []);
        assert!(op.is_noop());
        assert!(Operation::<u8>::move_items(2, 3, 2).is_noop());
        assert!(!Operation::<u8>::move_items(2, 3, 0).is_noop());
    }

    #[test]
    fn test_insert_at_end_is_valid() {
        assert_eq!(Operation::insert(3, [1, 2]).check(0, 3), Ok(5));
    }

    #[test]
    fn test_insert_past_end_fails() {
        let err = Operation::insert(4, [1]).check(1, 3).unwrap_err();
        assert_eq!(
            err,
            ListError::OutOfRange {
                position: 1,
                kind: OperationKind::Insert,
                index: 4,
                count: 1,
                len: 3,
            }
        );
    }

    #[test]
    fn test_delete_bounds() {
        assert_eq!(Operation::<u8>::delete(1, 2).check(0, 3), Ok(1));
        assert_eq!(Operation::<u8>::delete(3, 0).check(0, 3), Ok(3));
        assert!(Operation::<u8>::delete(2, 2).check(0, 3).is_err());
        assert!(Operation::<u8>::delete(usize::MAX, 1).check(0, 3).is_err());
    }

    #[test]
    fn test_replace_bounds() {
        assert_eq!(Operation::replace(1, [9, 9]).check(0, 3), Ok(3));
        assert!(Operation::replace(2, [9, 9]).check(0, 3).is_err());
    }

    #[test]
    fn test_move_bounds() {
        // Block of 2 taken from 5 items leaves 3, so `to` may be 0..=3
        assert_eq!(Operation::<u8>::move_items(0, 2, 3).check(0, 5), Ok(5));
        assert!(Operation::<u8>::move_items(0, 2, 4).check(0, 5).is_err());
        assert!(Operation::<u8>::move_items(4, 2, 0).check(0, 5).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(OperationKind::Replace.to_string(), "replace");
        assert_eq!(OperationKind::Move.to_string(), "move");
    }
}
