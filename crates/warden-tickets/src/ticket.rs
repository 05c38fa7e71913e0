//! Tickets: a privilege level, per-group verb grants and accessible folders.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use warden_core::VfsPath;

use crate::error::{TicketError, TicketResult};

/// Privilege level, ordered `NoAccess < Guest < User < Admin < Root`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Cannot touch any zone.
    #[default]
    NoAccess = 1,
    /// Shared and temporary areas only.
    Guest = 2,
    /// The caller's own home as well.
    User = 3,
    /// Other homes and installed applications as well.
    Admin = 4,
    /// Everything, system paths included.
    Root = 5,
}

impl Level {
    /// Every level, lowest first.
    pub const ALL: [Self; 5] = [
        Self::NoAccess,
        Self::Guest,
        Self::User,
        Self::Admin,
        Self::Root,
    ];

    /// Numeric rank (1 to 5).
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAccess => "no_access",
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
            Self::Root => "root",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s) || level.rank().to_string() == s)
            .ok_or_else(|| TicketError::InvalidTicket(format!("unknown level {s:?}")))
    }
}

/// A capability ticket.
///
/// A wildcard ticket bypasses every check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ticket {
    /// Privilege level compared against zone requirements.
    pub level: Level,
    /// Allowed verbs per action group.
    #[serde(default)]
    pub permissions: BTreeMap<String, BTreeSet<String>>,
    /// Folders the ticket may touch, for `file` and `folder` actions.
    #[serde(default)]
    pub accessible_folders: Vec<VfsPath>,
    /// Grants everything.
    #[serde(default)]
    pub wildcard: bool,
}

impl Ticket {
    /// Start building a ticket at `level`.
    #[must_use]
    pub fn builder(level: Level) -> TicketBuilder {
        TicketBuilder::new(level)
    }

    /// A ticket that allows everything.
    #[must_use]
    pub fn wildcard() -> Self {
        Self {
            level: Level::Root,
            wildcard: true,
            ..Self::default()
        }
    }

    /// True if `verb` is granted under `group`.
    #[must_use]
    pub fn grants(&self, group: &str, verb: &str) -> bool {
        self.permissions
            .get(group)
            .is_some_and(|verbs| verbs.contains(verb))
    }

    /// Parse a ticket from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidTicket`] on malformed input.
    pub fn from_json(json: &str) -> TicketResult<Self> {
        serde_json::from_str(json).map_err(|e| TicketError::InvalidTicket(e.to_string()))
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidTicket`] if serialization fails.
    pub fn to_json(&self) -> TicketResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TicketError::InvalidTicket(e.to_string()))
    }
}

/// Builder for [`Ticket`].
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    /// A builder with no grants at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            ticket: Ticket {
                level,
                ..Ticket::default()
            },
        }
    }

    /// Grant one verb under `group`.
    #[must_use]
    pub fn allow(mut self, group: &str, verb: &str) -> Self {
        self.ticket
            .permissions
            .entry(group.to_owned())
            .or_default()
            .insert(verb.to_owned());
        self
    }

    /// Grant several verbs under `group`.
    #[must_use]
    pub fn allow_all<'a>(self, group: &str, verbs: impl IntoIterator<Item = &'a str>) -> Self {
        verbs
            .into_iter()
            .fold(self, |builder, verb| builder.allow(group, verb))
    }

    /// Add an accessible folder. Duplicates are ignored.
    #[must_use]
    pub fn folder(mut self, path: &str) -> Self {
        let path = VfsPath::parse(path);
        if !self.ticket.accessible_folders.contains(&path) {
            self.ticket.accessible_folders.push(path);
        }
        self
    }

    /// Make the ticket a wildcard.
    #[must_use]
    pub fn wildcard(mut self) -> Self {
        self.ticket.wildcard = true;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Ticket {
        self.ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order() {
        assert!(Level::NoAccess < Level::Guest);
        assert!(Level::Admin < Level::Root);
        assert_eq!(Level::User.rank(), 3);
        assert_eq!("admin".parse::<Level>().unwrap(), Level::Admin);
        assert_eq!("2".parse::<Level>().unwrap(), Level::Guest);
        assert!("wizard".parse::<Level>().is_err());
    }

    #[test]
    fn test_builder() {
        let ticket = Ticket::builder(Level::User)
            .allow_all("file", ["read", "write"])
            .allow("folder", "read")
            .folder("/users/alice/")
            .folder("/users/alice")
            .build();
        assert!(ticket.grants("file", "write"));
        assert!(!ticket.grants("folder", "make"));
        assert_eq!(ticket.accessible_folders, vec![VfsPath::parse("/users/alice")]);
        assert!(!ticket.wildcard);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "level": "user",
            "permissions": {"file": ["read"]},
            "accessible_folders": ["/users/alice"]
        }"#;
        let ticket = Ticket::from_json(json).unwrap();
        assert_eq!(ticket.level, Level::User);
        assert!(ticket.grants("file", "read"));
        assert_eq!(Ticket::from_json(&ticket.to_json().unwrap()).unwrap(), ticket);
        assert!(Ticket::from_json(r#"{"level": "emperor"}"#).is_err());
    }
}
