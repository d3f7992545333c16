//! Editing model for a bound behavior tree.
//!
//! # Modules
//!
//! - `document`: the `GraphDocument` entry point (binding, selection, focus, undo)
//! - `commands`: structural edits, drag, copy/paste and breakpoints
//! - `selection`: selection set, click policy and box selection
//! - `focus`: the editing-depth stack
//! - `undo`: undo records, transactions and the undo tree
//! - `clipboard`: the shared copy/paste slot
//! - `input`: pointer events, modifiers and canvas conversion
//!
//! # Example
//!
//! ```
//! use btquill::editor::selection::{SelectIntent, SelectPolicy};
//! use btquill::document::node::NodeKind;
//!
//! // Shift-click on a composite selects the whole branch
//! assert_eq!(SelectIntent::shift().policy(NodeKind::Composite), SelectPolicy::Branch);
//! ```

pub mod clipboard;
mod commands;
pub mod document;
pub mod focus;
pub mod input;
pub mod selection;
pub mod undo;

pub use document::GraphDocument;
