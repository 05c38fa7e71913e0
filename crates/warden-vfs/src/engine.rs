//! The public engine.
//!
//! A [`Vfs`] owns the tree, the metadata table, the settings and the current
//! directory. Every operation resolves its path against the current
//! directory, asks the authority, checks forbidden characters and only then
//! touches the store, so a refused or failed call leaves no trace.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use warden_core::{Clock, SystemClock, VfsPath, is_parent, normalize};

use crate::authority::{AccessRequest, Action, Authority, RequestExtra};
use crate::error::{VfsError, VfsResult};
use crate::flags::{Flag, Flags};
use crate::node::Node;
use crate::settings::VfsSettings;
use crate::snapshot::{FolderSnapshot, Snapshot};
use crate::table::{FsTable, TableEntry};

/// An in-memory filesystem gated by an optional [`Authority`].
pub struct Vfs {
    storage: Node,
    table: FsTable,
    settings: VfsSettings,
    cwd: VfsPath,
    authority: Option<Arc<dyn Authority>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Vfs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vfs")
            .field("nodes", &self.storage.count())
            .field("entries", &self.table.len())
            .field("settings", &self.settings)
            .field("cwd", &self.cwd)
            .field("authority", &self.authority.is_some())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs {
    /// An empty store (root only) with default settings and no authority.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(VfsSettings::default())
    }

    /// An empty store with the given settings.
    #[must_use]
    pub fn with_settings(settings: VfsSettings) -> Self {
        Self {
            storage: Node::empty_dir(),
            table: FsTable::new(),
            settings,
            cwd: VfsPath::root(),
            authority: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Attach an authority consulted before every gated operation.
    #[must_use]
    pub fn with_authority(mut self, authority: Arc<dyn Authority>) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Use `clock` for metadata timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace or detach the authority.
    pub fn set_authority(&mut self, authority: Option<Arc<dyn Authority>>) {
        self.authority = authority;
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &VfsSettings {
        &self.settings
    }

    // ---- helpers ----

    fn resolve(&self, input: &str) -> VfsPath {
        normalize(input, &self.cwd, self.settings.separator())
    }

    /// Render a path with this store's separator.
    #[must_use]
    pub fn render(&self, path: &VfsPath) -> String {
        path.render(self.settings.separator())
    }

    fn gate(&self, action: Action, path: &VfsPath, extra: RequestExtra<'_>) -> VfsResult<()> {
        let Some(authority) = &self.authority else {
            return Ok(());
        };
        if authority.check(&AccessRequest {
            action,
            path,
            extra,
        }) {
            return Ok(());
        }
        let rendered = self.render(path);
        warn!(action = %action, path = %rendered, "Authority denied operation");
        Err(VfsError::Denied {
            action,
            path: rendered,
        })
    }

    fn check_chars(&self, path: &VfsPath) -> VfsResult<()> {
        match self
            .settings
            .forbidden_chars()
            .chars()
            .find(|&c| path.contains_char(c))
        {
            Some(character) => Err(VfsError::ForbiddenCharacter {
                path: self.render(path),
                character,
            }),
            None => Ok(()),
        }
    }

    /// Forbidden characters only matter on lookups in strict mode.
    fn check_lookup_chars(&self, path: &VfsPath) -> VfsResult<()> {
        if self.settings.is_strict_forbid() {
            self.check_chars(path)
        } else {
            Ok(())
        }
    }

    fn now(&self) -> u64 {
        self.clock.now_millis()
    }

    fn protected(&self, path: &VfsPath, flag: Flag) -> VfsError {
        VfsError::FlagProtected {
            path: self.render(path),
            flag,
        }
    }

    fn removal_blocker(&self, path: &VfsPath) -> Option<Flag> {
        let entry = self.table.get(path)?;
        if entry.has(Flag::Undeletable) {
            Some(Flag::Undeletable)
        } else if entry.has(Flag::ReadOnly) && self.settings.read_only_implies_undeletable() {
            Some(Flag::ReadOnly)
        } else {
            None
        }
    }

    fn ensure_removable(&self, path: &VfsPath) -> VfsResult<()> {
        match self.removal_blocker(path) {
            Some(flag) => Err(self.protected(path, flag)),
            None => Ok(()),
        }
    }

    fn write_blocker(&self, path: &VfsPath) -> Option<Flag> {
        if self.table.has_flag(path, Flag::ReadOnly) {
            return Some(Flag::ReadOnly);
        }
        self.removal_blocker(path)
    }

    fn lookup(&self, path: &VfsPath) -> VfsResult<&Node> {
        self.storage
            .lookup(path)
            .ok_or_else(|| VfsError::NotFound(self.render(path)))
    }

    fn lookup_dir(&self, path: &VfsPath) -> VfsResult<&BTreeMap<String, Node>> {
        self.lookup(path)?
            .children()
            .ok_or_else(|| VfsError::NotADirectory(self.render(path)))
    }

    fn file_content(&self, path: &VfsPath) -> VfsResult<&str> {
        self.lookup(path)?
            .as_file()
            .ok_or_else(|| VfsError::NotAFile(self.render(path)))
    }

    /// The parent directory of `path` must already exist.
    fn ensure_parent_dir(&self, path: &VfsPath) -> VfsResult<()> {
        let parent = path.parent().ok_or(VfsError::RootOperation)?;
        self.lookup_dir(&parent).map(|_| ())
    }

    fn attach(&mut self, path: &VfsPath, node: Node) -> VfsResult<()> {
        self.ensure_parent_dir(path)?;
        let name = path.file_name().ok_or(VfsError::RootOperation)?;
        let parent = path.parent().ok_or(VfsError::RootOperation)?;
        let rendered = self.render(&parent);
        let children = self
            .storage
            .lookup_mut(&parent)
            .and_then(Node::children_mut)
            .ok_or(VfsError::NotADirectory(rendered))?;
        children.insert(name.to_owned(), node);
        Ok(())
    }

    fn detach(&mut self, path: &VfsPath) -> Option<Node> {
        let name = path.file_name()?;
        let parent = path.parent()?;
        self.storage
            .lookup_mut(&parent)?
            .children_mut()?
            .remove(name)
    }

    /// Write file content at an already authorized path.
    fn put_file(&mut self, path: &VfsPath, content: String) -> VfsResult<()> {
        if path.is_root() {
            return Err(VfsError::RootOperation);
        }
        match self.storage.lookup(path) {
            Some(Node::Directory(_)) => return Err(VfsError::NotAFile(self.render(path))),
            Some(Node::File(_)) => {
                if let Some(flag) = self.write_blocker(path) {
                    return Err(self.protected(path, flag));
                }
            },
            None => {},
        }

        let bytes = content.len();
        self.attach(path, Node::File(content))?;
        let now = self.now();
        self.table.get_or_create(path, now).modified_at = now;
        debug!(path = %self.render(path), bytes, "Wrote file");
        Ok(())
    }

    fn probe(&self, action: Action, input: &str) -> Option<&Node> {
        let path = self.resolve(input);
        self.gate(action, &path, RequestExtra::None).ok()?;
        self.check_lookup_chars(&path).ok()?;
        self.storage.lookup(&path)
    }

    // ---- existence ----

    /// True if a file or directory exists at `path`.
    ///
    /// Denials and forbidden characters (in strict mode) read as absence.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.probe(Action::Exists, path).is_some()
    }

    /// True if a file exists at `path`.
    #[must_use]
    pub fn file_exists(&self, path: &str) -> bool {
        self.probe(Action::FileExists, path)
            .is_some_and(|node| !node.is_dir())
    }

    /// True if a directory exists at `path`.
    #[must_use]
    pub fn dir_exists(&self, path: &str) -> bool {
        self.probe(Action::FolderExists, path).is_some_and(Node::is_dir)
    }

    // ---- files ----

    /// Read a file's content.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or a directory.
    pub fn read_file(&self, path: &str) -> VfsResult<String> {
        let path = self.resolve(path);
        self.gate(Action::FileRead, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.file_content(&path).map(str::to_owned)
    }

    /// Read a file and parse it as JSON.
    ///
    /// # Errors
    ///
    /// Fails like [`read_file`](Self::read_file), or with
    /// [`VfsError::InvalidJson`] on malformed content.
    pub fn read_json(&self, path: &str) -> VfsResult<serde_json::Value> {
        let content = self.read_file(path)?;
        serde_json::from_str(&content).map_err(|source| VfsError::InvalidJson {
            path: self.render(&self.resolve(path)),
            source,
        })
    }

    /// Write `content` to a file, creating it if needed.
    ///
    /// The first write creates the metadata entry; later writes only bump
    /// `modified_at`.
    ///
    /// # Errors
    ///
    /// Fails if denied, on the root, on a directory, when the parent is
    /// missing, when the path has a forbidden character, or when the file is
    /// read-only or undeletable.
    pub fn write_file(&mut self, path: &str, content: &str) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FileWrite, &path, RequestExtra::None)?;
        self.check_chars(&path)?;
        self.put_file(&path, content.to_owned())
    }

    /// Create an empty file.
    ///
    /// # Errors
    ///
    /// Fails if denied or if anything already exists at `path`, and
    /// otherwise like [`write_file`](Self::write_file).
    pub fn touch_file(&mut self, path: &str) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FileMake, &path, RequestExtra::None)?;
        self.check_chars(&path)?;
        if self.storage.lookup(&path).is_some() {
            return Err(VfsError::AlreadyExists(self.render(&path)));
        }
        self.put_file(&path, String::new())
    }

    /// Append `content` to a file, creating it if absent. Unless
    /// `no_newline` is set, a newline separates old and new content.
    ///
    /// # Errors
    ///
    /// Same conditions as [`write_file`](Self::write_file).
    pub fn append_file(&mut self, path: &str, content: &str, no_newline: bool) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FileAppend, &path, RequestExtra::None)?;
        self.check_chars(&path)?;
        let combined = match self.storage.lookup(&path) {
            None => content.to_owned(),
            Some(Node::File(existing)) => {
                let mut out = existing.clone();
                if !no_newline {
                    out.push('\n');
                }
                out.push_str(content);
                out
            },
            Some(Node::Directory(_)) => return Err(VfsError::NotAFile(self.render(&path))),
        };
        self.put_file(&path, combined)
    }

    /// Remove a file and its metadata entry.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, a directory, or protected by `u` (or by `r`
    /// when read-only implies undeletable).
    pub fn remove_file(&mut self, path: &str) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FileRemove, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.file_content(&path)?;
        self.ensure_removable(&path)?;

        self.detach(&path);
        self.table.remove(&path);
        debug!(path = %self.render(&path), "Removed file");
        Ok(())
    }

    /// Copy a file to a new path as a fresh write.
    ///
    /// # Errors
    ///
    /// Fails if denied, if `src` is not a file, or if `dst` already exists.
    pub fn copy_file(&mut self, src: &str, dst: &str) -> VfsResult<()> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);
        self.gate(Action::FileCopy, &src, RequestExtra::Destination(&dst))?;
        self.check_lookup_chars(&src)?;
        self.check_chars(&dst)?;

        let content = self.file_content(&src)?.to_owned();
        if self.storage.lookup(&dst).is_some() {
            return Err(VfsError::AlreadyExists(self.render(&dst)));
        }
        self.put_file(&dst, content)
    }

    /// Move a file: write the destination, then remove the source.
    ///
    /// # Errors
    ///
    /// Fails like [`copy_file`](Self::copy_file), or when the source is
    /// protected against removal. On failure neither path changes.
    pub fn move_file(&mut self, src: &str, dst: &str) -> VfsResult<()> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);
        self.gate(Action::FileMove, &src, RequestExtra::Destination(&dst))?;
        self.check_lookup_chars(&src)?;
        self.check_chars(&dst)?;

        let content = self.file_content(&src)?.to_owned();
        if self.storage.lookup(&dst).is_some() {
            return Err(VfsError::AlreadyExists(self.render(&dst)));
        }
        self.ensure_removable(&src)?;

        self.put_file(&dst, content)?;
        self.detach(&src);
        self.table.remove(&src);
        debug!(from = %self.render(&src), to = %self.render(&dst), "Moved file");
        Ok(())
    }

    /// Move a file or directory, carrying every metadata entry in the
    /// subtree along. A current directory inside `src` follows it.
    ///
    /// Non-strict mode requires both `file/rename` and `folder/rename`.
    /// Strict mode probes the item type first and requires only the matching
    /// permission.
    ///
    /// # Errors
    ///
    /// Fails if denied, on the root, if `src` is missing or protected, if
    /// `dst` exists or has no parent directory, or if `dst` lies inside
    /// `src`.
    pub fn rename(&mut self, src: &str, dst: &str, strict: bool) -> VfsResult<()> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);
        let extra = RequestExtra::Destination(&dst);
        if strict {
            let action = if self.lookup(&src)?.is_dir() {
                Action::FolderRename
            } else {
                Action::FileRename
            };
            self.gate(action, &src, extra)?;
        } else {
            self.gate(Action::FileRename, &src, extra)?;
            self.gate(Action::FolderRename, &src, extra)?;
        }
        self.check_lookup_chars(&src)?;
        self.check_chars(&dst)?;

        if src.is_root() || dst.is_root() {
            return Err(VfsError::RootOperation);
        }
        self.lookup(&src)?;
        if self.storage.lookup(&dst).is_some() {
            return Err(VfsError::AlreadyExists(self.render(&dst)));
        }
        if src.is_parent_of(&dst, false) {
            return Err(VfsError::InvalidDestination {
                from: self.render(&src),
                to: self.render(&dst),
            });
        }
        self.ensure_removable(&src)?;
        self.ensure_parent_dir(&dst)?;

        let node = self
            .detach(&src)
            .ok_or_else(|| VfsError::NotFound(self.render(&src)))?;
        self.attach(&dst, node)?;
        self.table.rekey_subtree(&src, &dst);
        if let Some(cwd) = self.cwd.rebase(&src, &dst) {
            self.cwd = cwd;
        }
        debug!(from = %self.render(&src), to = %self.render(&dst), "Renamed item");
        Ok(())
    }

    // ---- directories ----

    /// Create an empty directory and its metadata entry.
    ///
    /// # Errors
    ///
    /// Fails if denied, if anything exists at `path`, if the parent is
    /// missing, or if the path has a forbidden character.
    pub fn mkdir(&mut self, path: &str) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FolderMake, &path, RequestExtra::None)?;
        self.check_chars(&path)?;
        if self.storage.lookup(&path).is_some() {
            return Err(VfsError::AlreadyExists(self.render(&path)));
        }

        self.attach(&path, Node::empty_dir())?;
        let now = self.now();
        self.table.insert(path.clone(), TableEntry::new(now));
        debug!(path = %self.render(&path), "Created directory");
        Ok(())
    }

    /// True if the directory at `path` has at least one sub-directory.
    #[must_use]
    pub fn has_sub_folders(&self, path: &str) -> bool {
        self.probe(Action::FolderHasSubFolders, path)
            .and_then(Node::children)
            .is_some_and(|children| children.values().any(Node::is_dir))
    }

    /// List the names directly inside a directory, in name order. Hidden
    /// items are skipped unless `show_hidden` is set.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or not a directory.
    pub fn read_dir(&self, path: &str, show_hidden: bool) -> VfsResult<Vec<String>> {
        let path = self.resolve(path);
        self.gate(Action::FolderRead, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        let children = self.lookup_dir(&path)?;
        Ok(children
            .keys()
            .filter(|name| show_hidden || !self.table.has_flag(&path.join(name), Flag::Hidden))
            .cloned()
            .collect())
    }

    /// Remove a directory. A current directory inside it moves to its
    /// parent.
    ///
    /// The directory's own `u` flag (and `r` under the read-only policy)
    /// blocks removal. Descendants are removed regardless of their flags.
    ///
    /// # Errors
    ///
    /// Fails if denied, on the root, if missing or not a directory, if
    /// protected, or if non-empty without `recursive`.
    pub fn remove_tree(&mut self, path: &str, recursive: bool) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FolderRemove, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        if path.is_root() {
            return Err(VfsError::RootOperation);
        }
        if !self.lookup_dir(&path)?.is_empty() && !recursive {
            return Err(VfsError::DirectoryNotEmpty(self.render(&path)));
        }
        self.ensure_removable(&path)?;

        let entries = self.table.remove_subtree(&path);
        self.detach(&path);
        if path.is_parent_of(&self.cwd, true) {
            self.cwd = path.parent().unwrap_or_else(VfsPath::root);
        }
        debug!(path = %self.render(&path), entries, "Removed directory");
        Ok(())
    }

    /// Deep copy of a directory subtree.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or not a directory.
    pub fn get_tree(&self, path: &str) -> VfsResult<Node> {
        let path = self.resolve(path);
        self.gate(Action::FolderTree, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.lookup_dir(&path)?;
        self.lookup(&path).cloned()
    }

    /// Change the current directory.
    ///
    /// # Errors
    ///
    /// Fails if denied or if `path` is not an existing directory.
    pub fn chdir(&mut self, path: &str) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(Action::FolderCwd, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.lookup_dir(&path)?;
        self.cwd = path;
        Ok(())
    }

    /// The current directory.
    #[must_use]
    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    // ---- metadata ----

    fn entry_for(&self, path: &VfsPath) -> VfsResult<&TableEntry> {
        self.lookup(path)?;
        self.table
            .get(path)
            .ok_or_else(|| VfsError::NoTableEntry(self.render(path)))
    }

    /// Copy of the metadata entry for an existing item.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or without an entry (the root).
    pub fn get_table_entry(&self, path: &str) -> VfsResult<TableEntry> {
        let path = self.resolve(path);
        self.gate(Action::TableEntryRead, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.entry_for(&path).copied()
    }

    fn update_flags(
        &mut self,
        action: Action,
        path: &str,
        flags: Flags,
        apply: fn(&mut Flags, Flags),
    ) -> VfsResult<()> {
        let path = self.resolve(path);
        self.gate(action, &path, RequestExtra::Flags(flags))?;
        self.check_lookup_chars(&path)?;
        if path.is_root() {
            return Err(VfsError::RootOperation);
        }
        self.entry_for(&path)?;
        let rendered = self.render(&path);
        let entry = self
            .table
            .get_mut(&path)
            .ok_or_else(|| VfsError::NoTableEntry(rendered.clone()))?;
        apply(&mut entry.flags, flags);
        debug!(path = %rendered, flags = %entry.flags, "Updated flags");
        Ok(())
    }

    /// Add flags to an existing item.
    ///
    /// # Errors
    ///
    /// Fails if denied, on the root, or if the item is missing.
    pub fn add_flag(&mut self, path: &str, flags: impl Into<Flags>) -> VfsResult<()> {
        self.update_flags(Action::FlagWrite, path, flags.into(), Flags::insert_all)
    }

    /// Remove flags from an existing item.
    ///
    /// # Errors
    ///
    /// Fails if denied, on the root, or if the item is missing.
    pub fn remove_flag(&mut self, path: &str, flags: impl Into<Flags>) -> VfsResult<()> {
        self.update_flags(Action::FlagRemove, path, flags.into(), Flags::remove_all)
    }

    /// True if the item exists and carries `flag`.
    #[must_use]
    pub fn has_flag(&self, path: &str, flag: Flag) -> bool {
        let path = self.resolve(path);
        if self
            .gate(Action::FlagHas, &path, RequestExtra::Flags(flag.into()))
            .is_err()
            || self.check_lookup_chars(&path).is_err()
        {
            return false;
        }
        self.storage.lookup(&path).is_some() && self.table.has_flag(&path, flag)
    }

    /// All flags of an existing item.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or without an entry.
    pub fn get_flags(&self, path: &str) -> VfsResult<Flags> {
        let path = self.resolve(path);
        self.gate(Action::FlagRead, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.entry_for(&path).map(|entry| entry.flags)
    }

    // ---- settings ----

    /// The path separator.
    #[must_use]
    pub fn separator(&self) -> char {
        self.settings.separator()
    }

    /// Change the separator.
    ///
    /// # Errors
    ///
    /// Fails if denied, locked, if `separator` is `.` or forbidden, or if an
    /// existing item name contains it.
    pub fn set_separator(&mut self, separator: char) -> VfsResult<()> {
        let root = VfsPath::root();
        self.gate(
            Action::FolderSeparator,
            &root,
            RequestExtra::Separator(separator),
        )?;
        if self.settings.is_locked() {
            return Err(VfsError::SettingsLocked);
        }
        if self.storage.any_name_contains(separator) {
            return Err(VfsError::InvalidSetting(format!(
                "an existing item name contains {separator:?}"
            )));
        }
        self.settings.set_separator(separator)
    }

    /// The forbidden character set.
    #[must_use]
    pub fn forbidden_chars(&self) -> &str {
        self.settings.forbidden_chars()
    }

    /// True if `ch` is forbidden.
    #[must_use]
    pub fn is_forbidden(&self, ch: char) -> bool {
        self.settings.is_forbidden(ch)
    }

    /// Add forbidden characters.
    ///
    /// # Errors
    ///
    /// See [`VfsSettings::forbid`].
    pub fn forbid(&mut self, chars: &str) -> VfsResult<()> {
        self.settings.forbid(chars)
    }

    /// Remove a forbidden character.
    ///
    /// # Errors
    ///
    /// See [`VfsSettings::unforbid`].
    pub fn unforbid(&mut self, ch: char) -> VfsResult<()> {
        self.settings.unforbid(ch)
    }

    /// True in strict-forbid mode.
    #[must_use]
    pub fn is_strict_forbid(&self) -> bool {
        self.settings.is_strict_forbid()
    }

    /// Reject forbidden characters on lookups too.
    ///
    /// # Errors
    ///
    /// Fails when locked.
    pub fn enable_strict_forbid(&mut self) -> VfsResult<()> {
        self.settings.set_strict_forbid(true)
    }

    /// Only reject forbidden characters in written paths.
    ///
    /// # Errors
    ///
    /// Fails when locked.
    pub fn disable_strict_forbid(&mut self) -> VfsResult<()> {
        self.settings.set_strict_forbid(false)
    }

    /// Set whether read-only also blocks removal.
    ///
    /// # Errors
    ///
    /// Fails when locked.
    pub fn set_read_only_implies_undeletable(&mut self, value: bool) -> VfsResult<()> {
        self.settings.set_read_only_implies_undeletable(value)
    }

    /// Freeze the settings permanently.
    pub fn lock(&mut self) {
        self.settings.lock();
        info!("Settings locked");
    }

    /// True once settings are locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.settings.is_locked()
    }

    /// True if an authority is attached and answers the `agent/exist` probe.
    #[must_use]
    pub fn has_authority(&self) -> bool {
        let root = VfsPath::root();
        self.authority
            .as_ref()
            .is_some_and(|authority| authority.check(&AccessRequest::new(Action::AgentExist, &root)))
    }

    // ---- path helpers ----

    /// Resolve `input` against the current directory and separator.
    #[must_use]
    pub fn normalize(&self, input: &str) -> VfsPath {
        self.resolve(input)
    }

    /// True if `path` lies strictly inside `parent`.
    #[must_use]
    pub fn is_inside(&self, path: &str, parent: &str) -> bool {
        is_parent(&self.resolve(parent), &self.resolve(path), false)
    }

    // ---- snapshots ----

    /// Deep copy of the whole store and its configuration.
    ///
    /// # Errors
    ///
    /// Fails if denied.
    pub fn export(&self) -> VfsResult<Snapshot> {
        self.gate(Action::Export, &VfsPath::root(), RequestExtra::None)?;
        let table = self
            .table
            .iter()
            .map(|(path, entry)| (self.render(path), *entry))
            .collect();
        info!(
            nodes = self.storage.count(),
            entries = self.table.len(),
            "Exported store"
        );
        Ok(Snapshot {
            storage: self.storage.clone(),
            table,
            separator: self.settings.separator(),
            current_directory: self.render(&self.cwd),
            locked: self.settings.is_locked(),
            forbidden_chars: self.settings.forbidden_chars().to_owned(),
            strict_forbid: self.settings.is_strict_forbid(),
            read_only_implies_undeletable: self.settings.read_only_implies_undeletable(),
        })
    }

    /// Replace the whole store with `snapshot`.
    ///
    /// The snapshot is validated in full first; on failure the live store is
    /// untouched. The authority and clock are kept.
    ///
    /// # Errors
    ///
    /// Fails if denied, if settings are locked, or with
    /// [`VfsError::InvalidSnapshot`].
    pub fn import(&mut self, snapshot: Snapshot) -> VfsResult<()> {
        self.gate(Action::Import, &VfsPath::root(), RequestExtra::None)?;
        if self.settings.is_locked() {
            return Err(VfsError::SettingsLocked);
        }
        let restored = snapshot.restore()?;
        self.storage = restored.storage;
        self.table = restored.table;
        self.settings = restored.settings;
        self.cwd = restored.cwd;
        info!(
            nodes = self.storage.count(),
            entries = self.table.len(),
            "Imported store"
        );
        Ok(())
    }

    /// Deep copy of one directory and the metadata below it.
    ///
    /// # Errors
    ///
    /// Fails if denied, missing, or not a directory.
    pub fn export_folder(&self, path: &str) -> VfsResult<FolderSnapshot> {
        let path = self.resolve(path);
        self.gate(Action::FolderExport, &path, RequestExtra::None)?;
        self.check_lookup_chars(&path)?;
        self.lookup_dir(&path)?;

        let sep = self.settings.separator();
        let table = self
            .table
            .entries_under(&path)
            .map(|(rel, entry)| (rel.render(sep).split_off(sep.len_utf8()), *entry))
            .collect();
        Ok(FolderSnapshot {
            path: self.render(&path),
            folder: self.lookup(&path)?.clone(),
            table,
            separator: sep,
        })
    }

    /// Import a folder snapshot at `dest` (default: the path it was exported
    /// from). An existing item at the destination is replaced only with
    /// `force`, and only if it can be removed: the authority must also
    /// approve `folder/remove` (or `file/remove`) on it. A current directory
    /// that no longer exists afterwards moves to the destination's parent.
    ///
    /// # Errors
    ///
    /// Fails if denied, on an invalid snapshot, on the root, when the parent
    /// is missing, when the destination exists without `force`, or when it
    /// cannot be removed.
    pub fn import_folder(
        &mut self,
        snapshot: FolderSnapshot,
        dest: Option<&str>,
        force: bool,
    ) -> VfsResult<()> {
        let restored = snapshot.restore()?;
        let target = dest.map_or_else(|| restored.origin.clone(), |d| self.resolve(d));
        self.gate(Action::FolderImport, &target, RequestExtra::Force(force))?;
        self.check_chars(&target)?;
        if target.is_root() {
            return Err(VfsError::RootOperation);
        }

        restored
            .folder
            .validate_names(self.settings.separator())
            .map_err(VfsError::InvalidSnapshot)?;
        if let Some(character) = self
            .settings
            .forbidden_chars()
            .chars()
            .find(|&c| restored.folder.any_name_contains(c))
        {
            return Err(VfsError::ForbiddenCharacter {
                path: self.render(&target),
                character,
            });
        }
        self.ensure_parent_dir(&target)?;

        if self.storage.lookup(&target).is_some() {
            if !force {
                return Err(VfsError::AlreadyExists(self.render(&target)));
            }
            let removal = if self.lookup(&target)?.is_dir() {
                Action::FolderRemove
            } else {
                Action::FileRemove
            };
            self.gate(removal, &target, RequestExtra::None)?;
            self.ensure_removable(&target)?;
            self.table.remove_subtree(&target);
            self.detach(&target);
        }

        self.attach(&target, restored.folder)?;
        let now = self.now();
        self.table.insert(target.clone(), TableEntry::new(now));
        let entries = restored.entries.len();
        for (rel, entry) in restored.entries {
            self.table.insert(target.join_path(&rel), entry);
        }
        if !self.storage.lookup(&self.cwd).is_some_and(Node::is_dir) {
            self.cwd = target.parent().unwrap_or_else(VfsPath::root);
        }
        info!(path = %self.render(&target), entries, force, "Imported folder");
        Ok(())
    }
}
