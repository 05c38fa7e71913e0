//! Zone rules: the level a path requires, derived from where it lives.

use std::fmt;

use serde::{Deserialize, Serialize};
use warden_core::VfsPath;

use crate::ticket::Level;

/// A region of the namespace with its own minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Shared common area or temporary area.
    Shared,
    /// The caller's own home.
    OwnHome,
    /// Another user's home, or the applications area.
    Restricted,
    /// Everything else.
    System,
}

impl Zone {
    /// Minimum level required to touch this zone.
    #[must_use]
    pub fn required_level(self) -> Level {
        match self {
            Self::Shared => Level::Guest,
            Self::OwnHome => Level::User,
            Self::Restricted => Level::Admin,
            Self::System => Level::Root,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => write!(f, "shared"),
            Self::OwnHome => write!(f, "own home"),
            Self::Restricted => write!(f, "restricted"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Roots of each zone and the caller's username.
///
/// Rules are evaluated top to bottom and the first match wins: common or
/// temp, then the caller's home, then users or apps, then system. A zone
/// root itself belongs to its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRules {
    /// Shared area available to guests.
    pub common: VfsPath,
    /// Temporary area available to guests.
    pub temp: VfsPath,
    /// Parent of every user home.
    pub users: VfsPath,
    /// Installed applications.
    pub apps: VfsPath,
    /// The caller; without one no path is an own home.
    pub username: Option<String>,
}

impl Default for ZoneRules {
    fn default() -> Self {
        Self {
            common: VfsPath::parse("/users/common"),
            temp: VfsPath::parse("/tmp"),
            users: VfsPath::parse("/users"),
            apps: VfsPath::parse("/apps"),
            username: None,
        }
    }
}

impl ZoneRules {
    /// Default roots with no caller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default roots for `username`.
    #[must_use]
    pub fn for_user(username: impl Into<String>) -> Self {
        Self::default().with_username(username)
    }

    /// Set the caller.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// The caller's home, if a username is set.
    #[must_use]
    pub fn home(&self) -> Option<VfsPath> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| self.users.join(name))
    }

    /// The zone `path` falls in.
    #[must_use]
    pub fn zone(&self, path: &VfsPath) -> Zone {
        if self.common.is_parent_of(path, true) || self.temp.is_parent_of(path, true) {
            return Zone::Shared;
        }
        if self.home().is_some_and(|home| home.is_parent_of(path, true)) {
            return Zone::OwnHome;
        }
        if self.users.is_parent_of(path, true) || self.apps.is_parent_of(path, true) {
            return Zone::Restricted;
        }
        Zone::System
    }

    /// Level required to touch `path`.
    #[must_use]
    pub fn required_level(&self, path: &VfsPath) -> Level {
        self.zone(path).required_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(rules: &ZoneRules, path: &str) -> Level {
        rules.required_level(&VfsPath::parse(path))
    }

    #[test]
    fn test_zone_table() {
        let rules = ZoneRules::for_user("alice");
        assert_eq!(level(&rules, "/users/common/shared.txt"), Level::Guest);
        assert_eq!(level(&rules, "/users/common"), Level::Guest);
        assert_eq!(level(&rules, "/tmp/x"), Level::Guest);
        assert_eq!(level(&rules, "/users/alice/doc.txt"), Level::User);
        assert_eq!(level(&rules, "/users/alice"), Level::User);
        assert_eq!(level(&rules, "/users/bob/doc.txt"), Level::Admin);
        assert_eq!(level(&rules, "/users"), Level::Admin);
        assert_eq!(level(&rules, "/apps/editor"), Level::Admin);
        assert_eq!(level(&rules, "/sys/config"), Level::Root);
        assert_eq!(level(&rules, "/"), Level::Root);
    }

    #[test]
    fn test_no_username_has_no_home() {
        let rules = ZoneRules::new();
        assert_eq!(rules.home(), None);
        assert_eq!(level(&rules, "/users/alice/doc.txt"), Level::Admin);
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let rules = ZoneRules::new();
        assert_eq!(level(&rules, "/tmpfiles/x"), Level::Root);
        assert_eq!(level(&rules, "/usersx"), Level::Root);
    }

    #[test]
    fn test_custom_roots_from_json() {
        let rules: ZoneRules =
            serde_json::from_str(r#"{"temp": "/scratch", "username": "carol"}"#).unwrap();
        assert_eq!(level(&rules, "/scratch/a"), Level::Guest);
        assert_eq!(level(&rules, "/tmp/a"), Level::Root);
        assert_eq!(level(&rules, "/users/carol/a"), Level::User);
    }
}
