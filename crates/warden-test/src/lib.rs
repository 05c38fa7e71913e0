//! Shared test utilities for warden.
//!
//! Fake authorities, a manual clock, and fixture stores and tickets, for use
//! as a dev-dependency.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_test::{RecordingAuthority, sample_vfs};
//! use warden_vfs::Action;
//!
//! let authority = RecordingAuthority::new();
//! let fs = sample_vfs()?.with_authority(Arc::new(authority.clone()));
//! fs.read_file("/users/alice/doc.txt")?;
//! assert_eq!(authority.actions(), vec![Action::FileRead]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
