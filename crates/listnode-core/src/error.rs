//! Error types for listnode.

use crate::operation::OperationKind;
use thiserror::Error;

/// Result alias used throughout listnode.
pub type Result<T, E = ListError> = std::result::Result<T, E>;

/// Errors surfaced by list mutations and queries.
///
/// None of these are fatal: a failed call leaves the sequence, the cell
/// cache and the geometry exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// A batch operation does not fit the running length of the sequence.
    #[error(
        "{kind} at position {position} in batch is out of range: index {index}, count {count}, running length {len}"
    )]
    OutOfRange {
        /// Position of the offending operation inside its batch.
        position: usize,
        kind: OperationKind,
        index: usize,
        count: usize,
        /// Sequence length after all earlier operations in the batch.
        len: usize,
    },

    /// A query addressed an index outside `[0, len)` (or the invalid sentinel).
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// An index path addressed a section that does not exist.
    #[error("section {section} out of bounds ({sections} sections)")]
    SectionOutOfBounds { section: usize, sections: usize },
}

impl ListError {
    /// Shorthand for an [`ListError::IndexOutOfBounds`].
    pub const fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Returns true if this error came from a batch mutation.
    pub const fn is_mutation_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Errors loading a [`ListConfig`](crate::ListConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML document did not match the configuration schema.
    #[error("invalid list configuration: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}
