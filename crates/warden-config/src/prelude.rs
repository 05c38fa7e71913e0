//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_config::prelude::*;` to import all essential types.

// Errors
pub use crate::{ConfigError, ConfigResult};

// Configuration
pub use crate::{Config, ResolvedConfig, ShowFormat};

// Sections
pub use crate::{EngineSection, HostSection, LoggingSection, StoreSection, ZonesSection};
