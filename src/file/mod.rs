//! File input for behavior-tree fixtures.

pub mod loader;
