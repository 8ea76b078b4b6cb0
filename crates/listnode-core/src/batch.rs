//! Atomic batches of structural edits.
//!
//! # Ordering
//!
//! Operations are applied in the order they were added, each against the
//! sequence left by the ones before it. A batch of `[delete(0, 1),
//! insert(0, ["a"])]` on `["x", "y"]` therefore yields `["a", "y"]`, while
//! `[insert(0, ["a"]), delete(0, 1)]` removes the freshly inserted `"a"`
//! and leaves `["x", "y"]`.
//!
//! # Atomicity
//!
//! [`Batch::apply`] walks the whole chain against the running length before
//! touching anything. A failing batch returns
//! [`ListError::OutOfRange`](crate::ListError::OutOfRange) and
//! leaves both the items and the [`Reindex`] target untouched.

use crate::error::Result;
use crate::operation::Operation;
use std::ops::Range;

/// Something keyed by item index that must follow structural edits.
///
/// The cell cache, the extent table and the section map all implement this
/// so a batch can reconcile them in the same sequential order as the items.
pub trait Reindex {
    /// `count` new slots appear at `at`; slots at `>= at` move up.
    fn insert_slots(&mut self, at: usize, count: usize);

    /// Slots in `range` disappear; slots after it move down.
    fn remove_slots(&mut self, range: Range<usize>);

    /// Slots in `range` now hold different items.
    fn replace_slots(&mut self, range: Range<usize>) {
        let _ = range;
    }

    /// The block `from` moves so it starts at `to` (an index into the
    /// sequence without the block).
    fn move_slots(&mut self, from: Range<usize>, to: usize) {
        let count = from.len();
        self.remove_slots(from);
        self.insert_slots(to, count);
    }
}

impl Reindex for () {
    fn insert_slots(&mut self, _at: usize, _count: usize) {}
    fn remove_slots(&mut self, _range: Range<usize>) {}
}

impl<R: Reindex + ?Sized> Reindex for &mut R {
    fn insert_slots(&mut self, at: usize, count: usize) {
        (**self).insert_slots(at, count);
    }

    fn remove_slots(&mut self, range: Range<usize>) {
        (**self).remove_slots(range);
    }

    fn replace_slots(&mut self, range: Range<usize>) {
        (**self).replace_slots(range);
    }

    fn move_slots(&mut self, from: Range<usize>, to: usize) {
        (**self).move_slots(from, to);
    }
}

macro_rules! impl_reindex_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: Reindex),+> Reindex for ($($name,)+) {
            fn insert_slots(&mut self, at: usize, count: usize) {
                $(self.$idx.insert_slots(at, count);)+
            }

            fn remove_slots(&mut self, range: Range<usize>) {
                $(self.$idx.remove_slots(range.clone());)+
            }

            fn replace_slots(&mut self, range: Range<usize>) {
                $(self.$idx.replace_slots(range.clone());)+
            }

            fn move_slots(&mut self, from: Range<usize>, to: usize) {
                $(self.$idx.move_slots(from.clone(), to);)+
            }
        }
    };
}

impl_reindex_tuple!(A.0, B.1);
impl_reindex_tuple!(A.0, B.1, C.2);

/// Summary of a successfully applied batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedBatch {
    /// Sequence length before the batch
    pub initial_len: usize,
    /// Sequence length after the batch
    pub final_len: usize,
    /// Number of operations applied
    pub operations: usize,
    /// Total items inserted
    pub inserted: usize,
    /// Total items deleted
    pub deleted: usize,
    /// Total items replaced in place
    pub replaced: usize,
    /// Total items moved
    pub moved: usize,
}

impl AppliedBatch {
    /// Net change in sequence length.
    pub const fn length_delta(&self) -> isize {
        self.final_len as isize - self.initial_len as isize
    }

    /// True if the batch changed nothing observable.
    pub const fn is_noop(&self) -> bool {
        self.inserted == 0 && self.deleted == 0 && self.replaced == 0 && self.moved == 0
    }
}

/// Ordered list of operations applied as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    operations: Vec<Operation<T>>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Batch<T> {
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Append an operation.
    pub fn add_operation(&mut self, operation: Operation<T>) -> &mut Self {
        self.operations.push(operation);
        self
    }

    /// Append an insert of `items` at `at`.
    pub fn insert(&mut self, at: usize, items: impl IntoIterator<Item = T>) -> &mut Self {
        self.add_operation(Operation::insert(at, items))
    }

    /// Append a delete of `count` items from `from`.
    pub fn delete(&mut self, from: usize, count: usize) -> &mut Self {
        self.add_operation(Operation::delete(from, count))
    }

    /// Append a move of `count` items from `from` to `to`.
    pub fn move_items(&mut self, from: usize, count: usize, to: usize) -> &mut Self {
        self.add_operation(Operation::move_items(from, count, to))
    }

    /// Append an in-place replacement starting at `at`.
    pub fn replace(&mut self, at: usize, items: impl IntoIterator<Item = T>) -> &mut Self {
        self.add_operation(Operation::replace(at, items))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[Operation<T>] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation<T>> {
        self.operations.iter()
    }

    /// Check every operation against the running length starting at `len`.
    ///
    /// Returns the final length on success.
    pub fn validate(&self, len: usize) -> Result<usize> {
        self.operations
            .iter()
            .enumerate()
            .try_fold(len, |running, (position, op)| op.check(position, running))
    }

    /// Apply the batch to `items`, reconciling `target` after each operation.
    ///
    /// Nothing is modified unless the whole batch validates.
    pub fn apply<R: Reindex + ?Sized>(
        self,
        items: &mut Vec<T>,
        target: &mut R,
    ) -> Result<AppliedBatch> {
        let initial_len = items.len();
        let final_len = self.validate(initial_len)?;

        let mut applied = AppliedBatch {
            initial_len,
            final_len,
            operations: self.operations.len(),
            ..AppliedBatch::default()
        };

        for op in self.operations {
            match op {
                Operation::Insert { at, items: new } => {
                    let count = new.len();
                    if count == 0 {
                        continue;
                    }
                    let tail = items.split_off(at);
                    items.extend(new);
                    items.extend(tail);
                    target.insert_slots(at, count);
                    applied.inserted += count;
                }
                Operation::Delete { at, count } => {
                    if count == 0 {
                        continue;
                    }
                    items.drain(at..at + count);
                    target.remove_slots(at..at + count);
                    applied.deleted += count;
                }
                Operation::Replace { at, items: new } => {
                    let count = new.len();
                    if count == 0 {
                        continue;
                    }
                    for (slot, item) in items[at..at + count].iter_mut().zip(new) {
                        *slot = item;
                    }
                    target.replace_slots(at..at + count);
                    applied.replaced += count;
                }
                Operation::Move { from, count, to } => {
                    if count == 0 || from == to {
                        continue;
                    }
                    move_block(items, from, count, to);
                    target.move_slots(from..from + count, to);
                    applied.moved += count;
                }
            }
        }

        debug_assert_eq!(items.len(), final_len);
        tracing::debug!(
            initial_len,
            final_len,
            operations = applied.operations,
            "batch applied"
        );
        Ok(applied)
    }
}

/// Move `[from, from + count)` so it starts at `to` in the shortened sequence.
pub fn move_block<T>(items: &mut [T], from: usize, count: usize, to: usize) {
    if to < from {
        items[to..from + count].rotate_right(count);
    } else if to > from {
        items[from..to + count].rotate_left(count);
    }
}

impl<T> FromIterator<Operation<T>> for Batch<T> {
    fn from_iter<I: IntoIterator<Item = Operation<T>>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<Operation<T>> for Batch<T> {
    fn extend<I: IntoIterator<Item = Operation<T>>>(&mut self, iter: I) {
        self.operations.extend(iter);
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = Operation<T>;
    type IntoIter = std::vec::IntoIter<Operation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Batch<T> {
    type Item = &'a Operation<T>;
    type IntoIter = std::slice::Iter<'a, Operation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
