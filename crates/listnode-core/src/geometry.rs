//! Geometry value types shared by the resolver and the controller.
//!
//! All extents and offsets are measured along the scroll axis in logical
//! points.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Sentinel for "no index". Every query treats it as out of bounds.
pub const INVALID_INDEX: usize = usize::MAX;

/// Content insets along the scroll axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeInsets {
    /// Space before the first cell
    pub leading: f32,
    /// Space after the last cell
    pub trailing: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self {
        leading: 0.0,
        trailing: 0.0,
    };

    pub const fn new(leading: f32, trailing: f32) -> Self {
        Self { leading, trailing }
    }

    /// Same inset on both ends.
    pub const fn uniform(inset: f32) -> Self {
        Self::new(inset, inset)
    }

    /// Total inset along the axis.
    pub fn total(&self) -> f32 {
        self.leading + self.trailing
    }

    /// Negative and non-finite insets become zero.
    pub fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self::new(clean(self.leading), clean(self.trailing))
    }
}

/// Where a scrolled-to cell should end up in the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollPosition {
    /// Cell's leading edge at the viewport's leading edge
    #[default]
    Top,
    /// Cell centred in the viewport
    Middle,
    /// Cell's trailing edge at the viewport's trailing edge
    Bottom,
}

/// One-shot scroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub index: usize,
    pub position: ScrollPosition,
    pub animated: bool,
}

impl ScrollTarget {
    pub const fn new(index: usize, position: ScrollPosition) -> Self {
        Self {
            index,
            position,
            animated: false,
        }
    }

    #[must_use]
    pub const fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}

/// Visible range information
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRange {
    /// First visible item index
    pub start: usize,
    /// Last visible item index (exclusive)
    pub end: usize,
    /// First item to render (including overscan)
    pub render_start: usize,
    /// Last item to render (exclusive, including overscan)
    pub render_end: usize,
    /// Content offset of the first rendered item
    pub offset: f32,
}

impl VisibleRange {
    /// Get range of visible items
    pub fn visible_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Get range of items to render
    pub fn render_range(&self) -> Range<usize> {
        self.render_start..self.render_end
    }

    /// First visible index, if any
    pub fn first(&self) -> Option<usize> {
        (self.end > self.start).then_some(self.start)
    }

    /// Last visible index (inclusive), if any
    pub fn last(&self) -> Option<usize> {
        (self.end > self.start).then(|| self.end - 1)
    }

    /// Check if index is visible
    pub fn is_visible(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// Check if index should be rendered
    pub fn should_render(&self, index: usize) -> bool {
        index >= self.render_start && index < self.render_end
    }

    /// Number of visible items
    pub fn visible_count(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Number of items to render
    pub fn render_count(&self) -> usize {
        self.render_end.saturating_sub(self.render_start)
    }
}

/// Address of an item inside a sectioned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}
