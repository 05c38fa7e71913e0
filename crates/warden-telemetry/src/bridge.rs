//! Logging config derived from a loaded [`warden_config::Config`].

use warden_config::LoggingSection;

use crate::logging::{LogConfig, LogFormat};

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        let mut config = Self::new(section.level.to_ascii_lowercase())
            .with_format(LogFormat::from_name(&section.format));
        for directive in &section.directives {
            config = config.with_directive(directive);
        }
        match &section.file {
            Some(file) => config.with_file(file),
            None => config,
        }
    }
}
