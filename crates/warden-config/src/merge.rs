//! Layered merging with per-field source tracking.

use std::collections::BTreeMap;
use std::fmt;

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Embedded `defaults.toml`.
    Defaults,
    /// `~/.warden/config.toml`.
    User,
    /// `{workspace}/.warden/config.toml`.
    Workspace,
    /// A `WARDEN_*` environment variable.
    Environment,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::User => write!(f, "user"),
            Self::Workspace => write!(f, "workspace"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Dotted field path to the layer that last set it.
pub type FieldSources = BTreeMap<String, ConfigLayer>;

/// Merge `overlay` into `base`, recording `layer` as the source of every
/// leaf it sets. Tables merge key by key; anything else replaces the base
/// value outright.
pub fn deep_merge_tracking(
    base: &mut toml::Value,
    overlay: &toml::Value,
    prefix: &str,
    layer: ConfigLayer,
    sources: &mut FieldSources,
) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let path = join(prefix, key);
                match base_table.get_mut(key) {
                    Some(existing) => deep_merge_tracking(existing, value, &path, layer, sources),
                    None => {
                        record(value, &path, layer, sources);
                        base_table.insert(key.clone(), value.clone());
                    },
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
            record(overlay, prefix, layer, sources);
        },
    }
}

/// Mark every leaf under `value` as coming from `layer`.
pub fn record(value: &toml::Value, prefix: &str, layer: ConfigLayer, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = value {
        for (key, child) in table {
            record(child, &join(prefix, key), layer, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), layer);
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
