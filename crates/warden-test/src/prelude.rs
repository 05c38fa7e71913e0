//! Prelude module - commonly used test utilities.
//!
//! Use `use warden_test::prelude::*;` in test modules.

// Fakes
pub use crate::{DenyActions, ManualClock, RecordedCall, RecordingAuthority};

// Fixtures
pub use crate::{sample_vfs, ticket_for, zones_for};
