//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Log levels accepted in `logging.level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Formats accepted in `logging.format`.
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_engine(config)?;
    validate_zones(config)?;
    validate_logging(config)?;
    validate_store(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn validate_engine(config: &Config) -> ConfigResult<()> {
    let e = &config.engine;
    let mut chars = e.separator.chars();
    let sep = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(invalid(
                "engine.separator",
                format!("'{}' must be exactly one character", e.separator),
            ));
        },
    };
    if sep == '.' {
        return Err(invalid("engine.separator", "'.' cannot be the separator"));
    }
    if e.forbidden_chars.contains(sep) {
        return Err(invalid(
            "engine.forbidden_chars",
            format!("separator '{sep}' cannot be forbidden"),
        ));
    }
    Ok(())
}

fn validate_zones(config: &Config) -> ConfigResult<()> {
    let z = &config.zones;
    let sep = config.engine.separator.as_str();
    for (field, root) in [
        ("zones.common", &z.common),
        ("zones.temp", &z.temp),
        ("zones.users", &z.users),
        ("zones.apps", &z.apps),
    ] {
        if !root.starts_with(sep) {
            return Err(invalid(field, format!("'{root}' must be an absolute path")));
        }
    }
    if let Some(name) = &z.username
        && (name.is_empty() || name.contains(sep))
    {
        return Err(invalid(
            "zones.username",
            format!("'{name}' is not a valid user name"),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }
    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_store(config: &Config) -> ConfigResult<()> {
    if config.store.snapshot.trim().is_empty() {
        return Err(invalid("store.snapshot", "snapshot path cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(config: &Config) -> Option<String> {
        match validate(config) {
            Err(ConfigError::ValidationError { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_separator_rules() {
        let mut config = Config::default();
        config.engine.separator = String::new();
        assert_eq!(field_of(&config).as_deref(), Some("engine.separator"));
        config.engine.separator = ".".to_owned();
        assert_eq!(field_of(&config).as_deref(), Some("engine.separator"));
        config.engine.separator = ":".to_owned();
        assert_eq!(field_of(&config).as_deref(), Some("engine.forbidden_chars"));
    }

    #[test]
    fn test_zone_roots_must_be_absolute() {
        let mut config = Config::default();
        config.zones.temp = "tmp".to_owned();
        assert_eq!(field_of(&config).as_deref(), Some("zones.temp"));

        let mut config = Config::default();
        config.zones.username = Some("a/b".to_owned());
        assert_eq!(field_of(&config).as_deref(), Some("zones.username"));
    }

    #[test]
    fn test_logging_values() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_owned();
        assert!(validate(&config).is_ok());
        config.logging.level = "loud".to_owned();
        assert_eq!(field_of(&config).as_deref(), Some("logging.level"));

        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(&config).as_deref(), Some("logging.format"));
    }
}
