//! Behavior-tree fixture loading.
//!
//! This module reads a `BehaviourTree` described in YAML from a file or from
//! stdin. Files ending in `.gz` are decompressed first. The editor model never
//! persists trees itself; loading exists so the CLI and tests can bind a
//! document to a tree kept on disk.

use crate::document::node::BehaviourTree;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Loads and parses a behavior tree file.
///
/// # Examples
///
/// ```no_run
/// use btquill::file::loader::load_tree_file;
///
/// let tree = load_tree_file("patrol.yaml").unwrap();
/// assert!(!tree.read_only);
/// ```
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid gzip when it
/// ends in `.gz`, or does not describe a behavior tree.
pub fn load_tree_file<P: AsRef<Path>>(path: P) -> Result<BehaviourTree> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))?
    };

    parse_tree(&content)
}

/// Loads a behavior tree from stdin until EOF.
pub fn load_tree_from_stdin() -> Result<BehaviourTree> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;
    parse_tree(&content)
}

/// Parses YAML text into a behavior tree.
pub fn parse_tree(content: &str) -> Result<BehaviourTree> {
    serde_yaml::from_str(content).context("Failed to parse behavior tree")
}

fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::node::NodeKind;

    #[test]
    fn test_parse_tree_defaults() {
        let tree = parse_tree(
            "root:\n  kind: root\n  type: Root\n  title: Root\n  children:\n    - kind: leaf\n      type: Idle\n      title: Idle\n",
        )
        .unwrap();

        assert!(!tree.read_only);
        assert_eq!(tree.root.data.kind, NodeKind::Root);
        assert_eq!(tree.root.children.len(), 1);
        assert_eq!(tree.root.children[0].data.title, "Idle");
    }

    #[test]
    fn test_parse_tree_rejects_garbage() {
        assert!(parse_tree("- 1\n- 2\n").is_err());
    }
}
