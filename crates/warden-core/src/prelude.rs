//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_core::prelude::*;` to import all essential types.

// Paths
pub use crate::{DEFAULT_SEPARATOR, VfsPath, is_parent, normalize};

// Time
pub use crate::{Clock, SystemClock};
