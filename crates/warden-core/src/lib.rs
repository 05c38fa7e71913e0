//! Warden Core - Foundation types for the warden virtual filesystem.
//!
//! This crate provides:
//! - Canonical virtual paths and the normalization algorithm shared by the
//!   in-memory engine and the gated host filesystem
//! - Parent/child containment checks
//! - A clock abstraction for metadata timestamps
//!
//! # Example
//!
//! ```
//! use warden_core::{VfsPath, normalize};
//!
//! let cwd = VfsPath::parse("/users/alice");
//! let path = normalize("../bob/./notes.txt", &cwd, '/');
//!
//! assert_eq!(path.to_string(), "/users/bob/notes.txt");
//! assert!(VfsPath::parse("/users").is_parent_of(&path, false));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod clock;
mod path;

pub use clock::{Clock, SystemClock};
pub use path::{DEFAULT_SEPARATOR, VfsPath, is_parent, normalize};
