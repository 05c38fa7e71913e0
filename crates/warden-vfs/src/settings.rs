//! Store configuration that can be frozen with a one-way lock.

use serde::{Deserialize, Serialize};
use warden_core::DEFAULT_SEPARATOR;

use crate::error::{VfsError, VfsResult};

/// Characters rejected in written paths by default.
pub const DEFAULT_FORBIDDEN_CHARS: &str = ":*?<>|";

/// Mutable store settings.
///
/// Every setter fails with [`VfsError::SettingsLocked`] once [`lock`] has
/// been called; the lock cannot be released.
///
/// [`lock`]: VfsSettings::lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfsSettings {
    separator: char,
    forbidden_chars: String,
    strict_forbid: bool,
    read_only_implies_undeletable: bool,
    locked: bool,
}

impl Default for VfsSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            forbidden_chars: DEFAULT_FORBIDDEN_CHARS.to_owned(),
            strict_forbid: false,
            read_only_implies_undeletable: true,
            locked: false,
        }
    }
}

impl VfsSettings {
    /// Default, unlocked settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The path separator.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// The forbidden character set.
    #[must_use]
    pub fn forbidden_chars(&self) -> &str {
        &self.forbidden_chars
    }

    /// True if `ch` is forbidden.
    #[must_use]
    pub fn is_forbidden(&self, ch: char) -> bool {
        self.forbidden_chars.contains(ch)
    }

    /// True if forbidden characters are rejected on every request, reads
    /// included.
    #[must_use]
    pub fn is_strict_forbid(&self) -> bool {
        self.strict_forbid
    }

    /// True if the read-only flag also blocks removal.
    #[must_use]
    pub fn read_only_implies_undeletable(&self) -> bool {
        self.read_only_implies_undeletable
    }

    /// True once [`lock`](Self::lock) has been called.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self) -> VfsResult<()> {
        if self.locked {
            return Err(VfsError::SettingsLocked);
        }
        Ok(())
    }

    /// Change the separator.
    ///
    /// # Errors
    ///
    /// Fails when locked, or when `separator` is `.` or forbidden.
    pub fn set_separator(&mut self, separator: char) -> VfsResult<()> {
        self.ensure_unlocked()?;
        if separator == '.' || self.is_forbidden(separator) {
            return Err(VfsError::InvalidSetting(format!(
                "{separator:?} cannot be used as a separator"
            )));
        }
        self.separator = separator;
        Ok(())
    }

    /// Add characters to the forbidden set; duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Fails when locked, when `chars` is empty, or when it contains the
    /// separator.
    pub fn forbid(&mut self, chars: &str) -> VfsResult<()> {
        self.ensure_unlocked()?;
        if chars.is_empty() {
            return Err(VfsError::InvalidSetting(
                "no characters to forbid".to_owned(),
            ));
        }
        if chars.contains(self.separator) {
            return Err(VfsError::InvalidSetting(
                "the separator cannot be forbidden".to_owned(),
            ));
        }
        for ch in chars.chars() {
            if !self.is_forbidden(ch) {
                self.forbidden_chars.push(ch);
            }
        }
        Ok(())
    }

    /// Remove a character from the forbidden set.
    ///
    /// # Errors
    ///
    /// Fails when locked or when `ch` is not forbidden.
    pub fn unforbid(&mut self, ch: char) -> VfsResult<()> {
        self.ensure_unlocked()?;
        if !self.is_forbidden(ch) {
            return Err(VfsError::InvalidSetting(format!("{ch:?} is not forbidden")));
        }
        self.forbidden_chars.retain(|c| c != ch);
        Ok(())
    }

    /// Toggle strict-forbid mode.
    ///
    /// # Errors
    ///
    /// Fails when locked.
    pub fn set_strict_forbid(&mut self, strict: bool) -> VfsResult<()> {
        self.ensure_unlocked()?;
        self.strict_forbid = strict;
        Ok(())
    }

    /// Toggle whether read-only implies undeletable.
    ///
    /// # Errors
    ///
    /// Fails when locked.
    pub fn set_read_only_implies_undeletable(&mut self, value: bool) -> VfsResult<()> {
        self.ensure_unlocked()?;
        self.read_only_implies_undeletable = value;
        Ok(())
    }

    /// Freeze the settings for the lifetime of the store.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Rebuild settings from snapshot fields, validating them as a set.
    pub(crate) fn restore(
        separator: char,
        forbidden_chars: String,
        strict_forbid: bool,
        read_only_implies_undeletable: bool,
        locked: bool,
    ) -> VfsResult<Self> {
        if separator == '.' {
            return Err(VfsError::InvalidSnapshot(
                "'.' cannot be the separator".to_owned(),
            ));
        }
        if forbidden_chars.contains(separator) {
            return Err(VfsError::InvalidSnapshot(
                "the separator is listed as forbidden".to_owned(),
            ));
        }
        Ok(Self {
            separator,
            forbidden_chars,
            strict_forbid,
            read_only_implies_undeletable,
            locked,
        })
    }
}
