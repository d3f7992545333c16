//! BTQuill - document and editing model for a behavior-tree node-graph editor.
//!
//! The crate wraps a behavior tree in an arena of editor nodes and layers the
//! editing state on top: selection, box selection, an editing-depth stack,
//! structural edit commands with grouped undo, copy/paste through a shared
//! clipboard slot, and printable node addresses.
//!
//! - `document`: the domain tree, its editor graph, addresses and clipboard codec
//! - `editor`: `GraphDocument` and everything that edits it
//! - `config`: user configuration
//! - `file`: loading tree fixtures from disk

pub mod config;
pub mod document;
pub mod editor;
pub mod file;
