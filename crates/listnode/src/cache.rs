// Cell Cache - lazily materialized, recyclable cell handles
//
// Provides:
// - Lazy creation through the rendering collaborator
// - Re-keying of live handles when items are inserted, deleted or moved
// - Eviction on delete/replace and outside a retention window
// - Generation-stamped tickets for cells that finish creating later
// - A retired queue so released handles can be recycled by the renderer

use crate::renderer::{CellRenderer, CellTicket, Creation, Generation};
use listnode_core::{ListError, Reindex, Result};
use std::collections::BTreeMap;
use std::mem;
use std::ops::Range;

/// Result of looking up a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSlot<H> {
    /// The cell is materialized
    Ready(H),
    /// Creation is in flight; the handle arrives with this ticket
    Pending(CellTicket),
    /// Not cached and no renderer is available to create it
    Unavailable,
}

impl<H> CellSlot<H> {
    pub fn ready(self) -> Option<H> {
        match self {
            Self::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// What happened to a handle delivered for a deferred ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The handle is now cached at the ticket's index
    Registered,
    /// The ticket no longer matches the cache; the handle was released
    Stale,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls into the renderer
    pub creations: u64,
    /// Creations that completed later
    pub deferred: u64,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that found nothing cached or pending
    pub misses: u64,
    /// Handles released by deletes, replacements, resets and proactive eviction
    pub evictions: u64,
    /// Deferred handles dropped because their ticket went stale
    pub stale_drops: u64,
}

impl CacheStats {
    /// Hit rate over all lookups that reached the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Maps item indices to materialized cell handles.
///
/// The cache owns every stored handle. Lookups hand out clones; once an entry
/// is evicted it moves to the retired queue and can no longer be found by
/// index.
#[derive(Debug)]
pub struct CellCache<H> {
    entries: BTreeMap<usize, H>,
    pending: BTreeMap<usize, CellTicket>,
    generation: Generation,
    retired: Vec<H>,
    stats: CacheStats,
}

impl<H> Default for CellCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> CellCache<H> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            pending: BTreeMap::new(),
            generation: Generation::default(),
            retired: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// Number of materialized cells
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Peek at a cached handle without creating one.
    pub fn get(&self, index: usize) -> Option<&H> {
        self.entries.get(&index)
    }

    /// Indices with a materialized cell, ascending.
    pub fn cached_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Register a deferred handle.
    ///
    /// A ticket from an older generation, or one that is no longer the
    /// in-flight request for its index, is stale: the handle goes straight to
    /// the retired queue.
    pub fn complete(&mut self, ticket: CellTicket, handle: H) -> Completion {
        let current = self.pending.get(&ticket.index) == Some(&ticket);
        if ticket.generation != self.generation || !current {
            self.stats.stale_drops += 1;
            tracing::debug!(
                index = ticket.index,
                ticket = %ticket.generation,
                current = %self.generation,
                "dropping stale cell"
            );
            self.retired.push(handle);
            return Completion::Stale;
        }
        self.pending.remove(&ticket.index);
        if let Some(previous) = self.entries.insert(ticket.index, handle) {
            self.retired.push(previous);
        }
        Completion::Registered
    }

    /// Evict and release every handle in `range`.
    ///
    /// In-flight requests in the range are forgotten, so their results will
    /// be dropped as stale.
    pub fn invalidate_range(&mut self, range: Range<usize>) -> usize {
        if range.is_empty() {
            return 0;
        }
        let taken = self.take_range(range.clone());
        let pending = split_range(&mut self.pending, range);
        drop(pending);
        self.retire(taken)
    }

    /// Evict everything and start a new generation.
    pub fn invalidate_all(&mut self) -> usize {
        self.begin_structural_change();
        let taken = mem::take(&mut self.entries);
        self.retire(taken)
    }

    /// Re-key every entry at `>= threshold` by `delta`, keeping the handles.
    pub fn shift_indices_from(&mut self, threshold: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let tail = self.entries.split_off(&threshold);
        for (index, handle) in tail {
            match index.checked_add_signed(delta) {
                Some(shifted) => {
                    if let Some(displaced) = self.entries.insert(shifted, handle) {
                        self.retire_one(displaced);
                    }
                }
                None => self.retire_one(handle),
            }
        }
    }

    /// Evict entries more than `margin` indices outside `keep`.
    pub fn evict_outside(&mut self, keep: Range<usize>, margin: usize) -> usize {
        let window = keep.start.saturating_sub(margin)..keep.end.saturating_add(margin);
        let kept = self.take_range(window);
        let evicted = mem::replace(&mut self.entries, kept);
        let count = self.retire(evicted);
        if count > 0 {
            tracing::debug!(count, "evicted cells outside retention window");
        }
        count
    }

    /// Start a new generation; in-flight tickets become stale.
    pub fn advance_generation(&mut self) -> Generation {
        self.begin_structural_change();
        self.generation
    }

    /// Take every handle released since the last drain.
    pub fn drain_retired(&mut self) -> Vec<H> {
        mem::take(&mut self.retired)
    }

    fn begin_structural_change(&mut self) {
        self.generation = self.generation.next();
        self.pending.clear();
    }

    fn take_range(&mut self, range: Range<usize>) -> BTreeMap<usize, H> {
        split_range(&mut self.entries, range)
    }

    fn retire(&mut self, entries: BTreeMap<usize, H>) -> usize {
        let count = entries.len();
        self.stats.evictions += count as u64;
        self.retired.extend(entries.into_values());
        count
    }

    fn retire_one(&mut self, handle: H) {
        self.stats.evictions += 1;
        self.retired.push(handle);
    }
}

impl<H: Clone> CellCache<H> {
    /// Cached handle for `index`, creating it through `renderer` if needed.
    ///
    /// Fails with [`ListError::IndexOutOfBounds`] when `index` is not a valid
    /// position in `items`.
    pub fn cell_for_index<T>(
        &mut self,
        index: usize,
        items: &[T],
        renderer: Option<&dyn CellRenderer<T, H>>,
    ) -> Result<CellSlot<H>> {
        let item = items
            .get(index)
            .ok_or_else(|| ListError::out_of_bounds(index, items.len()))?;

        if let Some(handle) = self.entries.get(&index) {
            self.stats.hits += 1;
            tracing::trace!(index, "cell cache hit");
            return Ok(CellSlot::Ready(handle.clone()));
        }
        if let Some(ticket) = self.pending.get(&index) {
            return Ok(CellSlot::Pending(*ticket));
        }

        self.stats.misses += 1;
        tracing::trace!(index, "cell cache miss");
        let Some(renderer) = renderer else {
            return Ok(CellSlot::Unavailable);
        };

        let ticket = CellTicket::new(index, self.generation);
        self.stats.creations += 1;
        match renderer.create_cell(item, ticket) {
            Creation::Ready(handle) => {
                self.entries.insert(index, handle.clone());
                Ok(CellSlot::Ready(handle))
            }
            Creation::Deferred => {
                self.stats.deferred += 1;
                self.pending.insert(index, ticket);
                Ok(CellSlot::Pending(ticket))
            }
        }
    }
}

impl<H> Reindex for CellCache<H> {
    fn insert_slots(&mut self, at: usize, count: usize) {
        self.begin_structural_change();
        self.shift_indices_from(at, count as isize);
    }

    fn remove_slots(&mut self, range: Range<usize>) {
        self.begin_structural_change();
        let count = range.len();
        let end = range.end;
        self.invalidate_range(range);
        self.shift_indices_from(end, -(count as isize));
    }

    fn replace_slots(&mut self, range: Range<usize>) {
        self.begin_structural_change();
        self.invalidate_range(range);
    }

    fn move_slots(&mut self, from: Range<usize>, to: usize) {
        self.begin_structural_change();
        let count = from.len();
        let start = from.start;
        let end = from.end;
        let block = self.take_range(from);
        self.shift_indices_from(end, -(count as isize));
        self.shift_indices_from(to, count as isize);
        for (index, handle) in block {
            self.entries.insert(to + (index - start), handle);
        }
    }
}

/// Remove and return the entries of `map` whose keys fall in `range`.
fn split_range<V>(map: &mut BTreeMap<usize, V>, range: Range<usize>) -> BTreeMap<usize, V> {
    let mut taken = map.split_off(&range.start);
    let mut tail = taken.split_off(&range.end);
    map.append(&mut tail);
    taken
}
