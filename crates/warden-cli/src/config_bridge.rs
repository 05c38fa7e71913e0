//! Bridge from `warden_config::Config` to engine and ticket types.

use warden_config::Config;
use warden_core::VfsPath;
use warden_tickets::ZoneRules;
use warden_vfs::{VfsResult, VfsSettings};

/// Settings for a freshly created store.
///
/// The configured forbidden set replaces the built-in one rather than
/// extending it.
pub(crate) fn to_settings(cfg: &Config) -> VfsResult<VfsSettings> {
    let engine = &cfg.engine;
    let mut settings = VfsSettings::new();
    for ch in settings.forbidden_chars().to_owned().chars() {
        settings.unforbid(ch)?;
    }
    if let Some(separator) = engine.separator.chars().next() {
        settings.set_separator(separator)?;
    }
    if !engine.forbidden_chars.is_empty() {
        settings.forbid(&engine.forbidden_chars)?;
    }
    settings.set_strict_forbid(engine.strict_forbid)?;
    settings.set_read_only_implies_undeletable(engine.read_only_implies_undeletable)?;
    if engine.lock {
        settings.lock();
    }
    Ok(settings)
}

/// Zone rules from the `[zones]` section.
pub(crate) fn to_zone_rules(cfg: &Config) -> ZoneRules {
    let zones = &cfg.zones;
    ZoneRules {
        common: VfsPath::parse(&zones.common),
        temp: VfsPath::parse(&zones.temp),
        users: VfsPath::parse(&zones.users),
        apps: VfsPath::parse(&zones.apps),
        username: zones.username.clone(),
    }
}

#[cfg(test)]
mod tests {
    use warden_tickets::Level;

    use super::*;

    #[test]
    fn test_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.engine.separator = "\\".to_owned();
        cfg.engine.forbidden_chars = "/#".to_owned();
        cfg.engine.strict_forbid = true;
        cfg.engine.lock = true;

        let settings = to_settings(&cfg).unwrap();
        assert_eq!(settings.separator(), '\\');
        assert_eq!(settings.forbidden_chars(), "/#");
        assert!(settings.is_strict_forbid());
        assert!(settings.is_locked());
    }

    #[test]
    fn test_default_config_matches_default_settings() {
        assert_eq!(to_settings(&Config::default()).unwrap(), VfsSettings::new());
    }

    #[test]
    fn test_zone_rules_from_config() {
        let mut cfg = Config::default();
        cfg.zones.users = "/home".to_owned();
        cfg.zones.username = Some("erin".to_owned());
        let rules = to_zone_rules(&cfg);
        assert_eq!(
            rules.required_level(&VfsPath::parse("/home/erin/x")),
            Level::User
        );
        assert_eq!(
            rules.required_level(&VfsPath::parse("/users/erin/x")),
            Level::Root
        );
    }
}
