//! Virtualized list engine.
//!
//! A [`ListNode`] presents a large, mutable sequence of items while only
//! materializing cells near the viewport:
//! - Cells: [`CellCache`] creates handles lazily through a [`CellRenderer`]
//!   and re-keys them as items are inserted, deleted or moved
//! - Geometry: [`IndexResolver`] maps indices to content offsets and back
//! - Mutation: [`Batch`]es apply atomically, each operation against the
//!   sequence left by the previous one
//! - Collaborators: [`CellRenderer`], [`ScrollSurface`], [`ListDataSource`]
//!   and [`ListDelegate`] are held weakly
//!
//! ```
//! use listnode::{CellRenderer, CellTicket, Creation, ListConfig, ListNode};
//! use std::rc::Rc;
//!
//! struct Labels;
//!
//! impl CellRenderer<String, String> for Labels {
//!     fn create_cell(&self, item: &String, _ticket: CellTicket) -> Creation<String> {
//!         Creation::Ready(item.to_uppercase())
//!     }
//! }
//!
//! let renderer = Rc::new(Labels);
//! let mut list: ListNode<String, String> = ListNode::new(ListConfig::default());
//! list.set_renderer(&renderer);
//! list.set_items(vec!["x".to_string(), "y".to_string()]);
//!
//! list.perform_batch_with(|batch| {
//!     batch.delete(0, 1).insert(0, ["a".to_string()]);
//! })
//! .unwrap();
//!
//! assert_eq!(list.items(), ["a", "y"]);
//! let cell = list.cell_for_item_at_index(0).unwrap().ready();
//! assert_eq!(cell.as_deref(), Some("A"));
//! ```

mod cache;
mod node;
mod renderer;
mod resolver;
mod sections;
mod source;
mod surface;

pub use cache::{CacheStats, CellCache, CellSlot, Completion};
pub use node::{ListNode, ListPhase};
pub use renderer::{CellRenderer, CellTicket, Creation, Generation};
pub use resolver::IndexResolver;
pub use sections::SectionMap;
pub use source::{ListDataSource, ListDelegate};
pub use surface::ScrollSurface;

pub use listnode_core::{
    AppliedBatch, Batch, ConfigError, EdgeInsets, IndexPath, ListConfig, ListError, Operation,
    OperationKind, Reindex, Result, ScrollPosition, ScrollTarget, VisibleRange, INVALID_INDEX,
};
