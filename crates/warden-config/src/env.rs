//! `WARDEN_*` environment variable fallbacks.
//!
//! A variable only applies when no config file set the field; files always
//! win over the environment.

use std::collections::HashMap;

use tracing::warn;

use crate::merge::{ConfigLayer, FieldSources};

/// How a variable's text becomes a TOML value.
#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Bool,
}

/// Variable name, dotted field path, value kind.
const FALLBACKS: &[(&str, &str, Kind)] = &[
    ("WARDEN_SEPARATOR", "engine.separator", Kind::Text),
    ("WARDEN_FORBIDDEN_CHARS", "engine.forbidden_chars", Kind::Text),
    ("WARDEN_STRICT_FORBID", "engine.strict_forbid", Kind::Bool),
    ("WARDEN_USER", "zones.username", Kind::Text),
    ("WARDEN_LOG_LEVEL", "logging.level", Kind::Text),
    ("WARDEN_LOG_FORMAT", "logging.format", Kind::Text),
    ("WARDEN_LOG_FILE", "logging.file", Kind::Text),
    ("WARDEN_STORE", "store.snapshot", Kind::Text),
    ("WARDEN_HOST_ROOT", "host.root", Kind::Text),
];

/// Snapshot of the process's `WARDEN_*` variables.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("WARDEN_"))
        .collect()
}

/// Apply variables from `env` to fields still at their default. Returns how
/// many were applied.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env: &HashMap<String, String>,
) -> usize {
    let mut applied = 0usize;
    for &(var, field, kind) in FALLBACKS {
        let Some(raw) = env.get(var) else {
            continue;
        };
        if sources
            .get(field)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }
        let value = match kind {
            Kind::Text => toml::Value::String(raw.clone()),
            Kind::Bool => match parse_bool(raw) {
                Some(b) => toml::Value::Boolean(b),
                None => {
                    warn!(var, value = %raw, "ignoring non-boolean environment value");
                    continue;
                },
            },
        };
        if set_field(merged, field, value) {
            sources.insert(field.to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        }
    }
    applied
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Set a dotted field, creating intermediate tables.
fn set_field(root: &mut toml::Value, field: &str, value: toml::Value) -> bool {
    let mut parts: Vec<&str> = field.split('.').collect();
    let Some(leaf) = parts.pop() else {
        return false;
    };
    let mut current = root;
    for part in parts {
        let Some(table) = current.as_table_mut() else {
            return false;
        };
        current = table
            .entry(part)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
    match current.as_table_mut() {
        Some(table) => {
            table.insert(leaf.to_owned(), value);
            true
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::record;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_env_fills_defaults() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"").unwrap();
        let mut sources = FieldSources::new();
        record(&merged.clone(), "", ConfigLayer::Defaults, &mut sources);

        let applied = apply_env_fallbacks(
            &mut merged,
            &mut sources,
            &env(&[("WARDEN_LOG_LEVEL", "debug"), ("WARDEN_HOST_ROOT", "/srv/data")]),
        );
        assert_eq!(applied, 2);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(merged["host"]["root"].as_str(), Some("/srv/data"));
        assert_eq!(sources.get("host.root"), Some(&ConfigLayer::Environment));
    }

    #[test]
    fn test_file_values_win() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Workspace);

        let applied =
            apply_env_fallbacks(&mut merged, &mut sources, &env(&[("WARDEN_LOG_LEVEL", "trace")]));
        assert_eq!(applied, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_bool_parsing() {
        let mut merged: toml::Value = toml::from_str("[engine]").unwrap();
        let mut sources = FieldSources::new();
        assert_eq!(
            apply_env_fallbacks(&mut merged, &mut sources, &env(&[("WARDEN_STRICT_FORBID", "maybe")])),
            0
        );
        assert_eq!(
            apply_env_fallbacks(&mut merged, &mut sources, &env(&[("WARDEN_STRICT_FORBID", "Yes")])),
            1
        );
        assert_eq!(merged["engine"]["strict_forbid"].as_bool(), Some(true));
    }
}
