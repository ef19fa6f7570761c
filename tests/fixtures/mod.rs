//! Test fixtures for deterministic testing

#![allow(dead_code)]

use fsinv::{MemoryStore, Node, NodeId, ScanOptions, Summary};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// MD5/SHA-1/SHA-256/SHA-512 of the two bytes `hi`.
pub const HI_MD5: [u8; 16] = hex_literal::hex!("49f68a5c8493ec2c0bf489821c21fc3b");
pub const HI_SHA1: [u8; 20] = hex_literal::hex!("c22b5f9178342609428d6f51b2c5af4c0bde6a42");
pub const HI_SHA256: [u8; 32] =
    hex_literal::hex!("8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4");
pub const HI_SHA512: [u8; 64] = hex_literal::hex!(
    "150a14ed5bea6cc731cf86c41566ac427a8db48ef1b9fd626664b3bfbb99071f"
    "a4c922f33dde38719b8c8354e2b7ab9d77e0e67fc12843920a712e73d558e197"
);

/// Digests of the empty input.
pub const EMPTY_MD5: [u8; 16] = hex_literal::hex!("d41d8cd98f00b204e9800998ecf8427e");
pub const EMPTY_SHA256: [u8; 32] =
    hex_literal::hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");

pub fn write_file_sync<P: AsRef<Path>>(path: P, content: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Create `r/a/f` (containing `hi`) and the empty file `r/g`.
pub fn create_scenario_tree(base: &Path) -> std::io::Result<PathBuf> {
    let root = base.join("r");
    fs::create_dir_all(root.join("a"))?;
    write_file_sync(root.join("a/f"), b"hi")?;
    write_file_sync(root.join("g"), b"")?;
    Ok(root)
}

/// Create a chain of `levels` nested directories below `base`, with one file
/// in the innermost directory.
pub fn create_nested_tree(base: &Path, levels: usize) -> std::io::Result<PathBuf> {
    let root = base.join("deep");
    let mut dir = root.clone();
    for level in 0..levels {
        dir.push(format!("d{level}"));
    }
    fs::create_dir_all(&dir)?;
    write_file_sync(dir.join("leaf.txt"), b"leaf")?;
    Ok(root)
}

/// Scan `root` into a fresh [`MemoryStore`], naming the root node `r`.
pub fn scan_into_memory(root: &Path, opts: &ScanOptions) -> fsinv::Result<(Summary, MemoryStore)> {
    let mut store = MemoryStore::new();
    let summary = fsinv::scan_tree(root, OsStr::new("r"), None, &mut store, opts)?;
    Ok((summary, store))
}

/// The only node called `name`.
pub fn node_named<'s>(store: &'s MemoryStore, name: &str) -> &'s Node {
    let mut found = store.nodes().iter().filter(|node| node.name == name);
    let node = found.next().unwrap_or_else(|| panic!("no node named {name}"));
    assert!(found.next().is_none(), "more than one node named {name}");
    node
}

/// Path of names from the root down to `id`, joined with `/`.
pub fn logical_path(store: &MemoryStore, id: NodeId) -> String {
    let mut names = Vec::new();
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        let Some(node) = store.get(current) else {
            break;
        };
        names.push(node.name.to_string_lossy().to_string());
        cursor = node.parent;
    }
    names.reverse();
    names.join("/")
}
