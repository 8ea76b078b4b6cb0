//! Core types for the listnode virtualized list engine.
//!
//! This crate provides the pieces that do not depend on cells or renderers:
//! - Structural edits: [`Operation`], [`Batch`], [`Reindex`]
//! - Geometry values: [`EdgeInsets`], [`ScrollPosition`], [`ScrollTarget`], [`VisibleRange`]
//! - Configuration: [`ListConfig`]
//! - Errors: [`ListError`], [`ConfigError`]

mod batch;
mod config;
mod error;
mod geometry;
mod operation;

pub use batch::{move_block, AppliedBatch, Batch, Reindex};
pub use config::ListConfig;
pub use error::{ConfigError, ListError, Result};
pub use geometry::{
    EdgeInsets, IndexPath, ScrollPosition, ScrollTarget, VisibleRange, INVALID_INDEX,
};
pub use operation::{Operation, OperationKind};
