//! Configuration layering feeding the logging setup.

use warden_config::{Config, ConfigError, ConfigLayer, ShowFormat};
use warden_telemetry::{LogConfig, LogFormat, LogTarget};

#[test]
fn test_workspace_overrides_user_and_feeds_logging() {
    let home = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[logging]\nformat = \"json\"\ndirectives = [\"warden_vfs=debug\"]\n",
    )
    .unwrap();
    std::fs::create_dir(workspace.path().join(".warden")).unwrap();
    std::fs::write(
        workspace.path().join(".warden/config.toml"),
        "[logging]\nlevel = \"warn\"\nfile = \"logs/warden.log\"\n",
    )
    .unwrap();

    let resolved = Config::load_with_home(Some(workspace.path()), home.path()).unwrap();
    let log = LogConfig::from(&resolved.config.logging);
    assert_eq!(log.level, "warn");
    assert_eq!(log.format, LogFormat::Json);
    assert_eq!(log.directives, vec!["warden_vfs=debug"]);
    assert_eq!(log.target, LogTarget::File("logs/warden.log".into()));

    let sources = resolved.render(ShowFormat::Sources).unwrap();
    assert!(sources.contains("logging.level = \"warn\"  # workspace"));
    assert!(sources.contains("logging.format = \"json\"  # user"));
    assert_eq!(
        resolved.field_sources.get("engine.separator"),
        Some(&ConfigLayer::Defaults)
    );
}

#[test]
fn test_rendered_toml_reloads() {
    let home = tempfile::tempdir().unwrap();
    let resolved = Config::load_with_home(None, home.path()).unwrap();
    let rendered = resolved.render(ShowFormat::Toml).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, rendered).unwrap();
    assert_eq!(Config::load_file(&path).unwrap(), resolved.config);
}

#[test]
fn test_bad_values_are_rejected_with_field() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.toml"), "[zones]\napps = \"apps\"\n").unwrap();
    match Config::load_with_home(None, home.path()) {
        Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "zones.apps"),
        other => panic!("expected validation error, got {other:?}"),
    }
}
