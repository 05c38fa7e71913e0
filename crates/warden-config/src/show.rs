//! The resolved configuration and how it is displayed.

use std::fmt::Write as _;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::FieldSources;
use crate::types::Config;

/// Output format for [`ResolvedConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFormat {
    /// TOML, as it would appear in a config file.
    #[default]
    Toml,
    /// Pretty-printed JSON.
    Json,
    /// One `field = value  # layer` line per leaf.
    Sources,
}

impl ShowFormat {
    /// Parse a format name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "sources" => Some(Self::Sources),
            _ => None,
        }
    }
}

/// A loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The validated configuration.
    pub config: Config,
    /// Which layer set each field.
    pub field_sources: FieldSources,
    /// Files that contributed, in load order.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// Render in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SerializeError`] if serialization fails.
    pub fn render(&self, format: ShowFormat) -> ConfigResult<String> {
        match format {
            ShowFormat::Toml => toml::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::SerializeError(e.to_string())),
            ShowFormat::Json => serde_json::to_string_pretty(&self.config)
                .map_err(|e| ConfigError::SerializeError(e.to_string())),
            ShowFormat::Sources => {
                let value = toml::Value::try_from(&self.config)
                    .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
                let mut out = String::new();
                for (field, layer) in &self.field_sources {
                    if let Some(leaf) = lookup(&value, field) {
                        let _ = writeln!(out, "{field} = {leaf}  # {layer}");
                    }
                }
                Ok(out)
            },
        }
    }
}

fn lookup<'a>(value: &'a toml::Value, field: &str) -> Option<&'a toml::Value> {
    field
        .split('.')
        .try_fold(value, |current, part| current.get(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ConfigLayer;

    #[test]
    fn test_format_names() {
        assert_eq!(ShowFormat::from_name("TOML"), Some(ShowFormat::Toml));
        assert_eq!(ShowFormat::from_name("sources"), Some(ShowFormat::Sources));
        assert_eq!(ShowFormat::from_name("yaml"), None);
    }

    #[test]
    fn test_sources_render_annotates_layer() {
        let mut field_sources = FieldSources::new();
        field_sources.insert("engine.separator".to_owned(), ConfigLayer::Defaults);
        field_sources.insert("zones.username".to_owned(), ConfigLayer::Environment);
        let mut config = Config::default();
        config.zones.username = Some("alice".to_owned());
        let resolved = ResolvedConfig {
            config,
            field_sources,
            loaded_files: Vec::new(),
        };

        let out = resolved.render(ShowFormat::Sources).unwrap();
        assert!(out.contains("engine.separator = \"/\"  # defaults"));
        assert!(out.contains("zones.username = \"alice\"  # environment"));
    }
}
