use btquill::document::node::{Breakpoint, NodeKind};
use btquill::file::loader::load_tree_file;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const PATROL: &str = "\
read_only: true
root:
  kind: root
  type: Root
  title: Root
  children:
    - kind: composite
      type: Sequence
      title: Patrol
      position: { x: 10.0, y: 80.0 }
      children:
        - kind: leaf
          type: MoveTo
          title: Go to post
          breakpoint: enabled
        - kind: leaf
          type: Wait
          title: Wait
";

#[test]
fn test_load_plain_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patrol.yaml");
    fs::write(&path, PATROL).unwrap();

    let tree = load_tree_file(&path).unwrap();
    assert!(tree.read_only);
    assert_eq!(tree.root.subtree_len(), 4);

    let patrol = &tree.root.children[0];
    assert_eq!(patrol.data.kind, NodeKind::Composite);
    assert_eq!(patrol.data.position.y, 80.0);
    assert_eq!(patrol.children[0].data.breakpoint, Breakpoint::Enabled);
    assert_eq!(patrol.children[1].data.breakpoint, Breakpoint::None);
}

#[test]
fn test_load_gzipped_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patrol.yaml.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(PATROL.as_bytes()).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let tree = load_tree_file(&path).unwrap();
    assert_eq!(tree.root.children[0].data.title, "Patrol");
}

#[test]
fn test_corrupt_gzip_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml.gz");
    fs::write(&path, PATROL).unwrap();

    assert!(load_tree_file(&path).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_tree_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read file"));
}
