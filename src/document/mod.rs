//! Document model for behavior trees.
//!
//! This module holds the pieces that describe *what* is being edited:
//!
//! - `node`: the behavior-tree domain layer (kinds, breakpoints, owned nodes)
//! - `graph`: the arena of editor wrappers around domain nodes
//! - `address`: positional, printable node addresses
//! - `codec`: the clipboard payload format for copied subtrees

pub mod address;
pub mod codec;
pub mod graph;
pub mod node;
