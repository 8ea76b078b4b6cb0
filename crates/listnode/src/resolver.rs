// Index Resolver - logical index <-> content geometry
//
// Provides:
// - Uniform extents (index * extent) or per-item measured extents
// - Prefix sums refreshed lazily from the first changed index
// - Scroll targets aligned to top/middle/bottom and clamped to the content
// - Visible range lookup by binary search, with overscan

use listnode_core::{
    move_block, EdgeInsets, ListConfig, ListError, Reindex, Result, ScrollPosition, ScrollTarget,
    VisibleRange,
};
use std::ops::Range;

/// Extent of one item along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    value: f32,
    measured: bool,
}

impl Extent {
    const fn estimated(value: f32) -> Self {
        Self {
            value,
            measured: false,
        }
    }
}

/// Maps item indices to content offsets and back.
///
/// Content coordinates start at the leading edge of the leading inset, so
/// item 0 sits at `insets.leading`.
#[derive(Debug, Clone)]
pub struct IndexResolver {
    estimated_extent: f32,
    variable_extents: bool,
    insets: EdgeInsets,
    item_count: usize,
    /// Per-item extents (variable mode only)
    extents: Vec<Extent>,
    /// `positions[i]` is the start of item `i` relative to the first item;
    /// `positions[item_count]` is the total. Valid below `dirty_from`.
    positions: Vec<f32>,
    dirty_from: Option<usize>,
}

impl Default for IndexResolver {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}

impl IndexResolver {
    pub fn new(config: &ListConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            estimated_extent: config.estimated_extent,
            variable_extents: config.variable_extents,
            insets: config.content_insets,
            item_count: 0,
            extents: Vec::new(),
            positions: vec![0.0],
            dirty_from: None,
        }
    }

    /// Number of items the resolver tracks
    pub const fn len(&self) -> usize {
        self.item_count
    }

    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub const fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: EdgeInsets) {
        self.insets = insets.sanitized();
    }

    pub const fn estimated_extent(&self) -> f32 {
        self.estimated_extent
    }

    /// Forget all measurements and track `count` estimated items.
    pub fn reset(&mut self, count: usize) {
        self.item_count = count;
        self.extents.clear();
        if self.variable_extents {
            self.extents
                .resize(count, Extent::estimated(self.estimated_extent));
        }
        self.positions.clear();
        self.positions.push(0.0);
        self.mark_dirty(0);
    }

    /// Extent of item `index`.
    pub fn extent_of(&self, index: usize) -> Result<f32> {
        self.check_index(index)?;
        Ok(self.raw_extent(index))
    }

    /// True once the renderer has reported a measurement for `index`.
    pub fn is_measured(&self, index: usize) -> bool {
        self.extents.get(index).is_some_and(|e| e.measured)
    }

    /// Record a measured extent. Returns true if the geometry changed.
    ///
    /// Negative extents are treated as zero and non-finite ones are ignored.
    /// Uniform lists ignore measurements.
    pub fn set_measured_extent(&mut self, index: usize, extent: f32) -> Result<bool> {
        self.check_index(index)?;
        if !self.variable_extents || !extent.is_finite() {
            return Ok(false);
        }
        let value = extent.max(0.0);
        let slot = &mut self.extents[index];
        let changed = (slot.value - value).abs() > f32::EPSILON;
        *slot = Extent {
            value,
            measured: true,
        };
        if changed {
            self.mark_dirty(index);
        }
        Ok(changed)
    }

    /// Content offset of the leading edge of item `index`.
    pub fn offset_for_index(&mut self, index: usize) -> Result<f32> {
        self.check_index(index)?;
        Ok(self.insets.leading + self.position(index))
    }

    /// Total content extent including insets.
    pub fn content_extent(&mut self) -> f32 {
        self.insets.leading + self.position(self.item_count) + self.insets.trailing
    }

    /// Largest valid content offset for a viewport of `viewport`.
    pub fn max_scroll_offset(&mut self, viewport: f32) -> f32 {
        (self.content_extent() - sanitize(viewport)).max(0.0)
    }

    /// Content offset that brings `target.index` to `target.position`.
    pub fn target_offset(&mut self, target: &ScrollTarget, viewport: f32) -> Result<f32> {
        self.check_index(target.index)?;
        let viewport = sanitize(viewport);
        let start = self.offset_for_index(target.index)?;
        let extent = self.raw_extent(target.index);

        let raw = match target.position {
            ScrollPosition::Top => start - self.insets.leading,
            ScrollPosition::Middle => start + extent / 2.0 - viewport / 2.0,
            ScrollPosition::Bottom => start + extent + self.insets.trailing - viewport,
        };
        Ok(raw.max(0.0).min(self.max_scroll_offset(viewport)))
    }

    /// Index of the item covering content offset `offset`, if any.
    pub fn index_at_offset(&mut self, offset: f32) -> Option<usize> {
        if self.item_count == 0 {
            return None;
        }
        let y = sanitize(offset) - self.insets.leading;
        if y < 0.0 {
            return Some(0);
        }
        let index = self.first_ending_after(y);
        Some(index.min(self.item_count - 1))
    }

    /// Items intersecting `[offset, offset + viewport)` plus `overscan` on
    /// either side.
    ///
    /// `None` for an empty list or a viewport with no extent.
    pub fn visible_range(
        &mut self,
        offset: f32,
        viewport: f32,
        overscan: usize,
    ) -> Option<VisibleRange> {
        let viewport = sanitize(viewport);
        if self.item_count == 0 || viewport <= 0.0 {
            return None;
        }

        let top = sanitize(offset) - self.insets.leading;
        let bottom = top + viewport;

        let start = if top <= 0.0 {
            0
        } else {
            self.first_ending_after(top)
        };
        let end = self.first_starting_at_or_after(bottom).max(start);

        let render_start = start.saturating_sub(overscan);
        let render_end = end.saturating_add(overscan).min(self.item_count);
        let offset = self.insets.leading + self.position(render_start);

        Some(VisibleRange {
            start,
            end,
            render_start,
            render_end,
            offset,
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.item_count {
            Ok(())
        } else {
            Err(ListError::out_of_bounds(index, self.item_count))
        }
    }

    fn raw_extent(&self, index: usize) -> f32 {
        if self.variable_extents {
            self.extents
                .get(index)
                .map_or(self.estimated_extent, |e| e.value)
        } else {
            self.estimated_extent
        }
    }

    /// Start of item `index` relative to the first item (`index <= len`).
    fn position(&mut self, index: usize) -> f32 {
        if !self.variable_extents {
            return index as f32 * self.estimated_extent;
        }
        self.refresh();
        self.positions[index]
    }

    /// Number of items whose trailing edge is at or before `y`.
    fn first_ending_after(&mut self, y: f32) -> usize {
        if !self.variable_extents {
            let e = self.estimated_extent;
            return ((y / e).floor() as usize).min(self.item_count);
        }
        self.refresh();
        self.positions[1..].partition_point(|&end| end <= y)
    }

    /// Number of items whose leading edge is before `y`.
    fn first_starting_at_or_after(&mut self, y: f32) -> usize {
        if !self.variable_extents {
            let e = self.estimated_extent;
            return ((y / e).ceil().max(0.0) as usize).min(self.item_count);
        }
        self.refresh();
        self.positions[..self.item_count].partition_point(|&start| start < y)
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    /// Recompute prefix sums from the dirty watermark.
    fn refresh(&mut self) {
        let Some(from) = self.dirty_from.take() else {
            return;
        };
        if !self.variable_extents {
            return;
        }
        let from = from.min(self.positions.len().saturating_sub(1)).min(self.item_count);
        if self.positions.is_empty() {
            self.positions.push(0.0);
        }
        self.positions.truncate(from + 1);
        self.positions.reserve(self.item_count - from);
        let mut current = self.positions[from];
        for extent in &self.extents[from..] {
            current += extent.value;
            self.positions.push(current);
        }
        tracing::trace!(from, count = self.item_count, "refreshed prefix sums");
    }
}

impl Reindex for IndexResolver {
    fn insert_slots(&mut self, at: usize, count: usize) {
        self.item_count += count;
        if self.variable_extents {
            let tail = self.extents.split_off(at);
            self.extents
                .resize(at + count, Extent::estimated(self.estimated_extent));
            self.extents.extend(tail);
        }
        self.mark_dirty(at);
    }

    fn remove_slots(&mut self, range: Range<usize>) {
        self.item_count -= range.len();
        if self.variable_extents {
            self.extents.drain(range.clone());
        }
        self.mark_dirty(range.start);
    }

    fn replace_slots(&mut self, range: Range<usize>) {
        if self.variable_extents {
            let estimate = Extent::estimated(self.estimated_extent);
            self.extents[range.clone()].fill(estimate);
        }
        self.mark_dirty(range.start);
    }

    fn move_slots(&mut self, from: Range<usize>, to: usize) {
        if self.variable_extents {
            move_block(&mut self.extents, from.start, from.len(), to);
        }
        self.mark_dirty(from.start.min(to));
    }
}

/// Non-finite geometry is treated as zero.
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
