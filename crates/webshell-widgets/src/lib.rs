#![forbid(unsafe_code)]

//! Host-independent console widgets.
//!
//! - [`json_tree`]: JSON value to collapsible [`RenderNode`](json_tree::RenderNode) tree.
//! - [`history`]: append-only input history with cursor recall.
//! - [`input`]: line input control and the key binding that drives history.
//! - [`output`]: newest-first output pane with optional eviction.
//! - [`text`]: escaping helpers shared by the renderers.

pub mod history;
pub mod input;
pub mod json_tree;
pub mod output;
pub mod text;

pub use history::HistoryBuffer;
pub use input::{BindingOutcome, HistoryBinding, LineControl, LineInput};
pub use json_tree::{NodeKind, RenderNode, ScalarKind, TreeLines};
pub use output::{EntryId, OutputEntry, OutputPane, Pushed};
