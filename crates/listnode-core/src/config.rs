//! YAML configuration for a list.
//!
//! Every field is optional in the document; missing fields take the
//! defaults below.
//!
//! ```yaml
//! estimated_extent: 44.0
//! variable_extents: true
//! overscan_count: 3
//! retention_margin: 8
//! content_insets:
//!   leading: 0.0
//!   trailing: 0.0
//! ```

use crate::error::ConfigError;
use crate::geometry::EdgeInsets;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a virtualized list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Extent used for a cell until the renderer reports a measurement
    pub estimated_extent: f32,
    /// Track per-cell measured extents; otherwise every cell is `estimated_extent`
    pub variable_extents: bool,
    /// Number of cells to materialize before/after the visible window
    pub overscan_count: usize,
    /// Cached cells further than this outside the render window are evicted
    pub retention_margin: usize,
    /// Insets before the first and after the last cell
    pub content_insets: EdgeInsets,
}

impl ListConfig {
    pub const DEFAULT_ESTIMATED_EXTENT: f32 = 44.0;

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_estimated_extent(mut self, extent: f32) -> Self {
        self.estimated_extent = extent;
        self
    }

    #[must_use]
    pub const fn with_variable_extents(mut self, variable: bool) -> Self {
        self.variable_extents = variable;
        self
    }

    #[must_use]
    pub const fn with_overscan(mut self, count: usize) -> Self {
        self.overscan_count = count;
        self
    }

    #[must_use]
    pub const fn with_retention_margin(mut self, margin: usize) -> Self {
        self.retention_margin = margin;
        self
    }

    #[must_use]
    pub const fn with_content_insets(mut self, insets: EdgeInsets) -> Self {
        self.content_insets = insets;
        self
    }

    /// Clamp values the geometry cannot work with.
    ///
    /// A non-positive or non-finite estimate falls back to the default, and
    /// insets are made non-negative.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.estimated_extent.is_finite() || self.estimated_extent <= 0.0 {
            tracing::warn!(
                estimated_extent = self.estimated_extent,
                "invalid estimated extent, using default"
            );
            self.estimated_extent = Self::DEFAULT_ESTIMATED_EXTENT;
        }
        self.content_insets = self.content_insets.sanitized();
        self
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(contents)?;
        Ok(config.sanitized())
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded list configuration");
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Documented default configuration.
    pub fn default_yaml() -> String {
        format!(
            r"# listnode configuration
# Extent of a cell before it has been measured
estimated_extent: {:.1}
# Track measured extents per cell (false: all cells share estimated_extent)
variable_extents: false
# Cells materialized beyond each end of the visible window
overscan_count: 3
# Cached cells this far outside the render window are evicted
retention_margin: 8
content_insets:
  leading: 0.0
  trailing: 0.0
",
            Self::DEFAULT_ESTIMATED_EXTENT
        )
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            estimated_extent: Self::DEFAULT_ESTIMATED_EXTENT,
            variable_extents: false,
            overscan_count: 3,
            retention_margin: 8,
            content_insets: EdgeInsets::ZERO,
        }
    }
}
