//! Testing harness for listnode.
//!
//! Recording collaborators that count what the list asks of them, and a
//! [`ListHarness`] that wires them to a [`listnode::ListNode`]:
//!
//! ```
//! use listnode_test::{numbered_items, ListHarness};
//!
//! let mut harness = ListHarness::new(numbered_items(100));
//! harness.assert_visible(0, 10);
//!
//! harness.scroll(500.0);
//! harness.assert_visible(50, 60).assert_creations(20);
//! ```

mod harness;
mod renderer;
mod source;
mod surface;

pub use harness::{numbered_items, tight_config, ListHarness};
pub use renderer::{CreationMode, RecordingRenderer, TestCell};
pub use source::{DelegateEvent, RecordingDelegate, SectionedSource};
pub use surface::{OffsetChange, RecordingSurface};
