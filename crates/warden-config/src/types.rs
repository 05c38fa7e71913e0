//! Configuration types for warden.
//!
//! Every struct implements [`Default`] matching `defaults.toml`, so a bare
//! `[section]` header produces a working configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Virtual filesystem settings.
    pub engine: EngineSection,
    /// Zone roots used by ticket evaluation.
    pub zones: ZonesSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
    /// Where the snapshot lives.
    pub store: StoreSection,
    /// The gated host directory.
    pub host: HostSection,
}

// ---------------------------------------------------------------------------
// EngineSection
// ---------------------------------------------------------------------------

/// Settings applied to a fresh store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Path separator; exactly one character.
    pub separator: String,
    /// Characters rejected in created names.
    pub forbidden_chars: String,
    /// Also reject forbidden characters on lookups.
    pub strict_forbid: bool,
    /// Treat read-only entries as undeletable.
    pub read_only_implies_undeletable: bool,
    /// Lock settings once the store is opened.
    pub lock: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            separator: "/".to_owned(),
            forbidden_chars: ":*?<>|".to_owned(),
            strict_forbid: false,
            read_only_implies_undeletable: true,
            lock: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ZonesSection
// ---------------------------------------------------------------------------

/// Zone roots, written as absolute virtual paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonesSection {
    /// Shared area open to guests.
    pub common: String,
    /// Temporary area open to guests.
    pub temp: String,
    /// Parent of user homes.
    pub users: String,
    /// Installed applications.
    pub apps: String,
    /// The caller, whose home is `{users}/{username}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Default for ZonesSection {
    fn default() -> Self {
        Self {
            common: "/users/common".to_owned(),
            temp: "/tmp".to_owned(),
            users: "/users".to_owned(),
            apps: "/apps".to_owned(),
            username: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, or `"json"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["warden_vfs=debug"]`).
    pub directives: Vec<String>,
    /// Log file; stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreSection
// ---------------------------------------------------------------------------

/// Snapshot storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// JSON snapshot file the CLI reads and writes.
    pub snapshot: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            snapshot: "warden.json".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// HostSection
// ---------------------------------------------------------------------------

/// The host directory exposed through the gated filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSection {
    /// Root directory on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}
