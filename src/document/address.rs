//! Positional node addresses.
//!
//! An address identifies a node by the child indices leading from the master
//! root to it, rendered as a base64 string. Addresses are independent of
//! object identity: they survive the wrapper reconstruction that undo/redo
//! performs, and they can be handed to breakpoint tooling or scripts. They are
//! positional, so a structural edit may make an old address point at a
//! different node or at nothing.
//!
//! Each index `0..=254` is stored as a single byte. Larger indices are stored
//! as the escape byte `0xFF` followed by `index - 255` as an unsigned LEB128
//! varint, so wide parents never get truncated.
//!
//! # Example
//!
//! ```
//! use btquill::document::address::{decode_path, encode_path};
//!
//! let address = encode_path(&[0, 3, 300]);
//! assert_eq!(decode_path(address.as_str()), Some(vec![0, 3, 300]));
//! assert_eq!(decode_path("not base64!"), None);
//! ```

use super::graph::{Graph, NodeId};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

const ESCAPE: u8 = 0xFF;

/// A printable, positional node address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeAddress(String);

impl NodeAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the master root's address.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NodeAddress> for String {
    fn from(address: NodeAddress) -> Self {
        address.0
    }
}

/// Encodes a root-to-node index path.
pub fn encode_path(path: &[usize]) -> NodeAddress {
    let mut bytes = Vec::with_capacity(path.len());
    for &index in path {
        if index < ESCAPE as usize {
            bytes.push(index as u8);
        } else {
            bytes.push(ESCAPE);
            let mut rest = index - ESCAPE as usize;
            loop {
                let low = (rest & 0x7F) as u8;
                rest >>= 7;
                if rest == 0 {
                    bytes.push(low);
                    break;
                }
                bytes.push(low | 0x80);
            }
        }
    }
    NodeAddress(STANDARD.encode(bytes))
}

/// Decodes an address string back into its index path.
///
/// Returns `None` for invalid base64, a truncated or overlong wide index.
pub fn decode_path(address: &str) -> Option<Vec<usize>> {
    let bytes = STANDARD.decode(address).ok()?;
    let mut path = Vec::with_capacity(bytes.len());
    let mut iter = bytes.into_iter();
    while let Some(byte) = iter.next() {
        if byte != ESCAPE {
            path.push(byte as usize);
            continue;
        }
        let mut value: usize = 0;
        let mut shift = 0u32;
        loop {
            let next = iter.next()?;
            let chunk = usize::from(next & 0x7F);
            if shift >= usize::BITS || chunk.checked_shl(shift)? >> shift != chunk {
                return None;
            }
            value |= chunk << shift;
            if next & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        path.push(value.checked_add(ESCAPE as usize)?);
    }
    Some(path)
}

/// Computes the address of `node`, or `None` if the id is stale.
pub fn encode(graph: &Graph, node: NodeId) -> Option<NodeAddress> {
    graph.path_of(node).map(|path| encode_path(&path))
}

/// Resolves `address` against the graph's master root.
///
/// Any malformed or out-of-range address resolves to `None`.
pub fn decode(address: &str, graph: &Graph) -> Option<NodeId> {
    let path = decode_path(address)?;
    graph.node_at_path(&path)
}
