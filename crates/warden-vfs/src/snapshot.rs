//! Snapshot structures for export and import.
//!
//! Snapshots are deep, alias-free copies: the tree is owned data and the
//! table is re-keyed to rendered path strings. Importing validates the whole
//! snapshot before the live store is touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use warden_core::{DEFAULT_SEPARATOR, VfsPath, normalize};

use crate::error::{VfsError, VfsResult};
use crate::node::Node;
use crate::settings::VfsSettings;
use crate::table::{FsTable, TableEntry};

/// A full copy of a store: tree, table and configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The whole tree; must be a directory.
    pub storage: Node,
    /// Metadata keyed by absolute paths rendered with `separator`.
    pub table: BTreeMap<String, TableEntry>,
    /// Separator used by the exporting store.
    pub separator: char,
    /// Current directory, rendered with `separator`.
    pub current_directory: String,
    /// Settings lock state.
    pub locked: bool,
    /// Forbidden character set.
    pub forbidden_chars: String,
    /// Strict-forbid mode.
    pub strict_forbid: bool,
    /// Read-only-implies-undeletable policy.
    pub read_only_implies_undeletable: bool,
}

/// A validated snapshot, ready to replace the live store.
#[derive(Debug)]
pub(crate) struct RestoredStore {
    pub(crate) storage: Node,
    pub(crate) table: FsTable,
    pub(crate) settings: VfsSettings,
    pub(crate) cwd: VfsPath,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidSnapshot`] if the JSON does not have the
    /// snapshot shape (including table entries that are not 3-tuples).
    pub fn from_json(json: &str) -> VfsResult<Self> {
        serde_json::from_str(json).map_err(|e| VfsError::InvalidSnapshot(e.to_string()))
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidSnapshot`] if serialization fails.
    pub fn to_json(&self) -> VfsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VfsError::InvalidSnapshot(e.to_string()))
    }

    pub(crate) fn restore(self) -> VfsResult<RestoredStore> {
        let settings = VfsSettings::restore(
            self.separator,
            self.forbidden_chars,
            self.strict_forbid,
            self.read_only_implies_undeletable,
            self.locked,
        )?;
        let sep = settings.separator();

        if !self.storage.is_dir() {
            return Err(VfsError::InvalidSnapshot(
                "storage root must be a directory".to_owned(),
            ));
        }
        self.storage
            .validate_names(sep)
            .map_err(VfsError::InvalidSnapshot)?;

        let mut table = FsTable::new();
        for (key, entry) in self.table {
            if !key.starts_with(sep) {
                return Err(VfsError::InvalidSnapshot(format!(
                    "table key {key:?} is not absolute"
                )));
            }
            let path = normalize(&key, &VfsPath::root(), sep);
            if path.is_root() {
                return Err(VfsError::InvalidSnapshot(
                    "the root cannot have a table entry".to_owned(),
                ));
            }
            if self.storage.lookup(&path).is_none() {
                return Err(VfsError::InvalidSnapshot(format!(
                    "table key {key:?} has no matching item"
                )));
            }
            if table.get(&path).is_some() {
                return Err(VfsError::InvalidSnapshot(format!(
                    "table key {key:?} duplicates another entry"
                )));
            }
            table.insert(path, entry);
        }

        let cwd = normalize(&self.current_directory, &VfsPath::root(), sep);
        if !self.storage.lookup(&cwd).is_some_and(Node::is_dir) {
            return Err(VfsError::InvalidSnapshot(format!(
                "current directory {:?} is not a directory",
                self.current_directory
            )));
        }

        Ok(RestoredStore {
            storage: self.storage,
            table,
            settings,
            cwd,
        })
    }
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

/// A copy of one directory subtree and the metadata below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSnapshot {
    /// Where the folder was exported from, rendered with `separator`.
    pub path: String,
    /// The directory content.
    pub folder: Node,
    /// Metadata keyed by paths relative to the folder (no leading separator).
    pub table: BTreeMap<String, TableEntry>,
    /// Separator used to render `path` and the table keys.
    #[serde(default = "default_separator")]
    pub separator: char,
}

/// A validated folder snapshot.
#[derive(Debug)]
pub(crate) struct RestoredFolder {
    pub(crate) origin: VfsPath,
    pub(crate) folder: Node,
    pub(crate) entries: Vec<(VfsPath, TableEntry)>,
}

impl FolderSnapshot {
    /// Parse a folder snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidSnapshot`] on malformed input.
    pub fn from_json(json: &str) -> VfsResult<Self> {
        serde_json::from_str(json).map_err(|e| VfsError::InvalidSnapshot(e.to_string()))
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::InvalidSnapshot`] if serialization fails.
    pub fn to_json(&self) -> VfsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| VfsError::InvalidSnapshot(e.to_string()))
    }

    pub(crate) fn restore(self) -> VfsResult<RestoredFolder> {
        let sep = self.separator;
        if sep == '.' {
            return Err(VfsError::InvalidSnapshot(
                "'.' cannot be the separator".to_owned(),
            ));
        }
        if !self.folder.is_dir() {
            return Err(VfsError::InvalidSnapshot(
                "exported folder must be a directory".to_owned(),
            ));
        }
        self.folder
            .validate_names(sep)
            .map_err(VfsError::InvalidSnapshot)?;

        let mut entries = Vec::with_capacity(self.table.len());
        for (key, entry) in self.table {
            let rel = normalize(&key, &VfsPath::root(), sep);
            if rel.is_root() || self.folder.lookup(&rel).is_none() {
                return Err(VfsError::InvalidSnapshot(format!(
                    "table key {key:?} has no matching item in the folder"
                )));
            }
            entries.push((rel, entry));
        }

        Ok(RestoredFolder {
            origin: normalize(&self.path, &VfsPath::root(), sep),
            folder: self.folder,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json(table: &str, cwd: &str) -> String {
        format!(
            r#"{{
                "storage": {{"docs": {{"a.txt": "hi"}}}},
                "table": {table},
                "separator": "/",
                "current_directory": "{cwd}",
                "locked": false,
                "forbidden_chars": ":*",
                "strict_forbid": false,
                "read_only_implies_undeletable": true
            }}"#
        )
    }

    #[test]
    fn test_restore_valid_snapshot() {
        let json = snapshot_json(r#"{"/docs": [1, 1, ""], "/docs/a.txt": [1, 2, "r"]}"#, "/docs");
        let restored = Snapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored.table.len(), 2);
        assert_eq!(restored.cwd, VfsPath::parse("/docs"));
        assert_eq!(restored.settings.forbidden_chars(), ":*");
    }

    #[test]
    fn test_table_entry_must_be_triple() {
        let json = snapshot_json(r#"{"/docs": [1, 1]}"#, "/");
        assert!(matches!(
            Snapshot::from_json(&json),
            Err(VfsError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_orphan_table_entry_rejected() {
        let json = snapshot_json(r#"{"/ghost": [1, 1, ""]}"#, "/");
        let snapshot = Snapshot::from_json(&json).unwrap();
        assert!(matches!(snapshot.restore(), Err(VfsError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_cwd_must_be_directory() {
        let json = snapshot_json("{}", "/docs/a.txt");
        let snapshot = Snapshot::from_json(&json).unwrap();
        assert!(matches!(snapshot.restore(), Err(VfsError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_file_storage_rejected() {
        let mut snapshot = Snapshot::from_json(&snapshot_json("{}", "/")).unwrap();
        snapshot.storage = Node::File("x".to_owned());
        assert!(snapshot.restore().is_err());
    }

    #[test]
    fn test_folder_snapshot_defaults_separator() {
        let json = r#"{"path": "/docs", "folder": {"a": ""}, "table": {"a": [3, 4, "h"]}}"#;
        let folder = FolderSnapshot::from_json(json).unwrap();
        assert_eq!(folder.separator, '/');
        let restored = folder.restore().unwrap();
        assert_eq!(restored.origin, VfsPath::parse("/docs"));
        assert_eq!(restored.entries.len(), 1);
    }
}
