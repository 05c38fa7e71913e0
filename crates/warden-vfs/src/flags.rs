//! Item flags stored in the file system table.
//!
//! Flags serialize as a compact string of their letters (`h`, `r`, `u`), the
//! format used inside snapshots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single item flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Flag {
    /// Omitted from directory listings unless hidden items are requested.
    Hidden,
    /// Content cannot be written or appended.
    ReadOnly,
    /// The item cannot be removed, renamed or moved directly.
    Undeletable,
}

impl Flag {
    /// Every flag, in rendering order.
    pub const ALL: [Self; 3] = [Self::Hidden, Self::ReadOnly, Self::Undeletable];

    /// The letter used in flag strings.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Hidden => 'h',
            Self::ReadOnly => 'r',
            Self::Undeletable => 'u',
        }
    }

    /// Parse a flag letter.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'h' => Some(Self::Hidden),
            'r' => Some(Self::ReadOnly),
            'u' => Some(Self::Undeletable),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::ReadOnly => write!(f, "read-only"),
            Self::Undeletable => write!(f, "undeletable"),
        }
    }
}

/// A set of flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    hidden: bool,
    read_only: bool,
    undeletable: bool,
}

impl Flags {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn slot(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Hidden => &mut self.hidden,
            Flag::ReadOnly => &mut self.read_only,
            Flag::Undeletable => &mut self.undeletable,
        }
    }

    /// True if `flag` is set.
    #[must_use]
    pub fn contains(self, flag: Flag) -> bool {
        match flag {
            Flag::Hidden => self.hidden,
            Flag::ReadOnly => self.read_only,
            Flag::Undeletable => self.undeletable,
        }
    }

    /// Set `flag`.
    pub fn insert(&mut self, flag: Flag) {
        *self.slot(flag) = true;
    }

    /// Clear `flag`.
    pub fn remove(&mut self, flag: Flag) {
        *self.slot(flag) = false;
    }

    /// Set every flag in `other`.
    pub fn insert_all(&mut self, other: Self) {
        for flag in other.iter() {
            self.insert(flag);
        }
    }

    /// Clear every flag in `other`.
    pub fn remove_all(&mut self, other: Self) {
        for flag in other.iter() {
            self.remove(flag);
        }
    }

    /// True if no flag is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.hidden || self.read_only || self.undeletable)
    }

    /// Iterate the set flags in rendering order.
    pub fn iter(self) -> impl Iterator<Item = Flag> {
        Flag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        let mut flags = Self::empty();
        flags.insert(flag);
        flags
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.iter() {
            write!(f, "{}", flag.letter())?;
        }
        Ok(())
    }
}

/// Error returned when a flag string contains an unknown letter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flag letter {0:?}")]
pub struct UnknownFlag(pub char);

impl FromStr for Flags {
    type Err = UnknownFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| Flag::from_letter(c).ok_or(UnknownFlag(c)))
            .collect()
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
