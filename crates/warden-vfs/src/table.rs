//! The file system table: per-path metadata kept apart from tree content.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use warden_core::VfsPath;

use crate::flags::{Flag, Flags};

/// Metadata for one path.
///
/// Serializes as the triple `[created_at, modified_at, "flags"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// Creation time, milliseconds since the UNIX epoch.
    pub created_at: u64,
    /// Last content write, milliseconds since the UNIX epoch.
    pub modified_at: u64,
    /// Flags attached to the item.
    pub flags: Flags,
}

impl TableEntry {
    /// A fresh entry created at `now` with no flags.
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            created_at: now,
            modified_at: now,
            flags: Flags::empty(),
        }
    }

    /// True if `flag` is set.
    #[must_use]
    pub fn has(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }
}

impl Serialize for TableEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.created_at, self.modified_at, self.flags).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TableEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (created_at, modified_at, flags) = <(u64, u64, Flags)>::deserialize(deserializer)?;
        Ok(Self {
            created_at,
            modified_at,
            flags,
        })
    }
}

/// Flat mapping from canonical path to [`TableEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FsTable {
    entries: BTreeMap<VfsPath, TableEntry>,
}

impl FsTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `path`.
    #[must_use]
    pub fn get(&self, path: &VfsPath) -> Option<&TableEntry> {
        self.entries.get(path)
    }

    pub(crate) fn get_mut(&mut self, path: &VfsPath) -> Option<&mut TableEntry> {
        self.entries.get_mut(path)
    }

    /// Entry for `path`, created at `now` if missing.
    pub(crate) fn get_or_create(&mut self, path: &VfsPath, now: u64) -> &mut TableEntry {
        self.entries
            .entry(path.clone())
            .or_insert_with(|| TableEntry::new(now))
    }

    /// True if `path` has an entry carrying `flag`.
    #[must_use]
    pub fn has_flag(&self, path: &VfsPath, flag: Flag) -> bool {
        self.entries.get(path).is_some_and(|e| e.has(flag))
    }

    pub(crate) fn insert(&mut self, path: VfsPath, entry: TableEntry) {
        self.entries.insert(path, entry);
    }

    pub(crate) fn remove(&mut self, path: &VfsPath) -> Option<TableEntry> {
        self.entries.remove(path)
    }

    /// Remove `root` and every entry below it, returning how many went.
    pub(crate) fn remove_subtree(&mut self, root: &VfsPath) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, _| !path.starts_with(root));
        before.saturating_sub(self.entries.len())
    }

    /// Re-key `from` and everything below it to sit under `to`.
    pub(crate) fn rekey_subtree(&mut self, from: &VfsPath, to: &VfsPath) {
        let moved: Vec<VfsPath> = self
            .entries
            .keys()
            .filter(|path| path.starts_with(from))
            .cloned()
            .collect();
        for old in moved {
            if let (Some(entry), Some(new)) = (self.entries.remove(&old), old.rebase(from, to)) {
                self.entries.insert(new, entry);
            }
        }
    }

    /// Entries strictly below `root`, keyed relative to it.
    pub fn entries_under<'a>(
        &'a self,
        root: &'a VfsPath,
    ) -> impl Iterator<Item = (VfsPath, &'a TableEntry)> + 'a {
        self.entries.iter().filter_map(move |(path, entry)| {
            if !root.is_parent_of(path, false) {
                return None;
            }
            path.strip_prefix(root).map(|rel| (rel, entry))
        })
    }

    /// Iterate all entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&VfsPath, &TableEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> VfsPath {
        VfsPath::parse(s)
    }

    #[test]
    fn test_entry_serializes_as_triple() {
        let mut entry = TableEntry::new(5);
        entry.modified_at = 9;
        entry.flags.insert(Flag::Hidden);
        assert_eq!(serde_json::to_string(&entry).unwrap(), "[5,9,\"h\"]");
    }

    #[test]
    fn test_entry_rejects_wrong_arity() {
        assert!(serde_json::from_str::<TableEntry>("[1,2]").is_err());
        assert!(serde_json::from_str::<TableEntry>("[1,2,\"\",4]").is_err());
        assert!(serde_json::from_str::<TableEntry>("[1,2,\"hu\"]").is_ok());
    }

    #[test]
    fn test_remove_subtree() {
        let mut table = FsTable::new();
        for path in ["/a", "/a/b", "/a/b/c", "/ab", "/z"] {
            table.insert(p(path), TableEntry::new(0));
        }
        assert_eq!(table.remove_subtree(&p("/a")), 3);
        assert!(table.get(&p("/ab")).is_some());
        assert!(table.get(&p("/z")).is_some());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rekey_subtree() {
        let mut table = FsTable::new();
        table.insert(p("/src"), TableEntry::new(1));
        table.insert(p("/src/f"), TableEntry::new(2));
        table.rekey_subtree(&p("/src"), &p("/dst/moved"));
        assert_eq!(table.get(&p("/dst/moved")).map(|e| e.created_at), Some(1));
        assert_eq!(table.get(&p("/dst/moved/f")).map(|e| e.created_at), Some(2));
        assert!(table.get(&p("/src")).is_none());
    }

    #[test]
    fn test_entries_under_is_relative_and_strict() {
        let mut table = FsTable::new();
        table.insert(p("/dir"), TableEntry::new(0));
        table.insert(p("/dir/x"), TableEntry::new(1));
        table.insert(p("/dir/sub/y"), TableEntry::new(2));
        table.insert(p("/other"), TableEntry::new(3));

        let root = p("/dir");
        let rel: Vec<String> = table
            .entries_under(&root)
            .map(|(path, _)| path.to_string())
            .collect();
        assert_eq!(rel, vec!["/sub/y".to_string(), "/x".to_string()]);
    }
}
