//! The tree store.
//!
//! A directory owns its children exclusively, so the tree is acyclic by
//! construction. Parent lookups re-descend from the root instead of holding
//! back-references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use warden_core::VfsPath;

/// A node in the tree: file content or a directory of named children.
///
/// Serializes untagged: files are JSON strings, directories are JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// File content.
    File(String),
    /// Directory children keyed by name.
    Directory(BTreeMap<String, Node>),
}

/// The type of an existing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A file.
    File,
    /// A directory.
    Directory,
}

impl Node {
    /// An empty directory.
    #[must_use]
    pub fn empty_dir() -> Self {
        Self::Directory(BTreeMap::new())
    }

    /// The node's type.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::File(_) => NodeKind::File,
            Self::Directory(_) => NodeKind::Directory,
        }
    }

    /// True for directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    /// File content, if this is a file.
    #[must_use]
    pub fn as_file(&self) -> Option<&str> {
        match self {
            Self::File(content) => Some(content),
            Self::Directory(_) => None,
        }
    }

    /// Children, if this is a directory.
    #[must_use]
    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Self::Directory(children) => Some(children),
            Self::File(_) => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Self::Directory(children) => Some(children),
            Self::File(_) => None,
        }
    }

    /// Descend one segment at a time. Any missing or non-directory
    /// intermediate segment is a lookup failure.
    #[must_use]
    pub fn lookup(&self, path: &VfsPath) -> Option<&Node> {
        let mut node = self;
        for segment in path.segments() {
            node = node.children()?.get(segment)?;
        }
        Some(node)
    }

    pub(crate) fn lookup_mut(&mut self, path: &VfsPath) -> Option<&mut Node> {
        let mut node = self;
        for segment in path.segments() {
            node = node.children_mut()?.get_mut(segment)?;
        }
        Some(node)
    }

    /// Number of nodes in this subtree, itself included.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::File(_) => 1,
            Self::Directory(children) => children
                .values()
                .map(Node::count)
                .fold(1, usize::saturating_add),
        }
    }

    /// Check every name in the subtree: non-empty, not `.` or `..`, and free
    /// of `separator`.
    ///
    /// # Errors
    ///
    /// Returns a description of the first bad name found.
    pub fn validate_names(&self, separator: char) -> Result<(), String> {
        let Self::Directory(children) = self else {
            return Ok(());
        };
        for (name, child) in children {
            if name.is_empty() || name == "." || name == ".." {
                return Err(format!("invalid entry name {name:?}"));
            }
            if name.contains(separator) {
                return Err(format!(
                    "entry name {name:?} contains the separator {separator:?}"
                ));
            }
            child.validate_names(separator)?;
        }
        Ok(())
    }

    /// True if any name in the subtree contains `ch`.
    #[must_use]
    pub fn any_name_contains(&self, ch: char) -> bool {
        self.children().is_some_and(|children| {
            children
                .iter()
                .any(|(name, child)| name.contains(ch) || child.any_name_contains(ch))
        })
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::empty_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        serde_json::from_str(r#"{"a": {"b": "hello", "c": {}}, "top.txt": ""}"#).unwrap()
    }

    #[test]
    fn test_untagged_shape() {
        let tree = sample();
        assert_eq!(
            tree.lookup(&VfsPath::parse("/a/b")).and_then(Node::as_file),
            Some("hello")
        );
        assert_eq!(
            tree.lookup(&VfsPath::parse("/a/c")).map(Node::kind),
            Some(NodeKind::Directory)
        );
        assert!(tree.lookup(&VfsPath::root()).is_some());
    }

    #[test]
    fn test_lookup_through_file_fails() {
        let tree = sample();
        assert!(tree.lookup(&VfsPath::parse("/top.txt/x")).is_none());
        assert!(tree.lookup(&VfsPath::parse("/missing/x")).is_none());
    }

    #[test]
    fn test_rejects_non_tree_json() {
        assert!(serde_json::from_str::<Node>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Node>(r#"{"a": 3}"#).is_err());
        assert!(serde_json::from_str::<Node>(r#"{"a": null}"#).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(sample().validate_names('/').is_ok());
        let bad: Node = serde_json::from_str(r#"{"a": {"x/y": ""}}"#).unwrap();
        assert!(bad.validate_names('/').is_err());
        let dotdot: Node = serde_json::from_str(r#"{"..": {}}"#).unwrap();
        assert!(dotdot.validate_names('/').is_err());
    }

    #[test]
    fn test_count_and_name_search() {
        let tree = sample();
        assert_eq!(tree.count(), 5);
        assert!(tree.any_name_contains('.'));
        assert!(!tree.any_name_contains('#'));
    }
}
