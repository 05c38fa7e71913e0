//! Canonical virtual paths.
//!
//! A [`VfsPath`] is an absolute path stored as its ordered sequence of
//! non-empty segments; the root is the empty sequence. The separator is only
//! relevant when parsing or rendering, so two paths are equal iff their
//! segment sequences are equal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator used when no other is configured.
pub const DEFAULT_SEPARATOR: char = '/';

/// A canonical absolute path in the virtual namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    /// The root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path relative to the root.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        normalize(input, &Self::root(), DEFAULT_SEPARATOR)
    }

    /// Build a path by folding raw segments (`.`, `..` and empty segments are
    /// resolved exactly as [`normalize`] would).
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = Self::root();
        for segment in segments {
            path.push_raw(segment.as_ref());
        }
        path
    }

    fn push_raw(&mut self, segment: &str) {
        match segment {
            "" | "." => {},
            // Popping past the root is a no-op.
            ".." => {
                self.segments.pop();
            },
            name => self.segments.push(name.to_owned()),
        }
    }

    /// The segments of this path, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The containing directory, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self {
            segments: head.to_vec(),
        })
    }

    /// Append one segment (itself folded, so `..` walks up).
    #[must_use]
    pub fn join(&self, segment: &str) -> Self {
        let mut out = self.clone();
        out.push_raw(segment);
        out
    }

    /// Append every segment of `relative`.
    #[must_use]
    pub fn join_path(&self, relative: &Self) -> Self {
        let mut out = self.clone();
        out.segments.extend(relative.segments.iter().cloned());
        out
    }

    /// True if `self` begins with every segment of `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// True if `self` is a strict ancestor of `path` (or equal to it when
    /// `accept_same` is set).
    #[must_use]
    pub fn is_parent_of(&self, path: &Self, accept_same: bool) -> bool {
        is_parent(self, path, accept_same)
    }

    /// The remainder of `self` after `prefix`, if `prefix` is an ancestor or
    /// equal.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| Self {
                segments: rest.to_vec(),
            })
    }

    /// Move `self` from under `from` to under `to`.
    #[must_use]
    pub fn rebase(&self, from: &Self, to: &Self) -> Option<Self> {
        self.strip_prefix(from).map(|rest| to.join_path(&rest))
    }

    /// True if any segment contains `ch`.
    #[must_use]
    pub fn contains_char(&self, ch: char) -> bool {
        self.segments.iter().any(|s| s.contains(ch))
    }

    /// Render with the given separator. The root renders as the separator
    /// alone.
    #[must_use]
    pub fn render(&self, separator: char) -> String {
        if self.is_root() {
            return separator.to_string();
        }
        let mut out = String::new();
        for segment in &self.segments {
            out.push(separator);
            out.push_str(segment);
        }
        out
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_SEPARATOR))
    }
}

impl From<&str> for VfsPath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Serialize for VfsPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VfsPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Resolve `input` into a canonical absolute path.
///
/// Inputs not starting with `separator` are taken relative to `cwd`. The
/// segments are folded left to right: `..` pops (a no-op at the root), `.`
/// and empty segments are dropped. The result is idempotent under
/// re-normalization.
#[must_use]
pub fn normalize(input: &str, cwd: &VfsPath, separator: char) -> VfsPath {
    let mut out = if input.starts_with(separator) {
        VfsPath::root()
    } else {
        cwd.clone()
    };
    for segment in input.split(separator) {
        out.push_raw(segment);
    }
    out
}

/// True iff `path` starts with all of `parent`'s segments and is strictly
/// longer, or also when equal if `accept_same` is set.
#[must_use]
pub fn is_parent(parent: &VfsPath, path: &VfsPath, accept_same: bool) -> bool {
    if !path.starts_with(parent) {
        return false;
    }
    path.depth() > parent.depth() || accept_same
}
