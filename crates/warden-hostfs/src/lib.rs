//! Warden Host FS - a ticket-gated window onto a real directory.
//!
//! The same path normalization and containment rules as the in-memory
//! engine decide which operations a ticket may perform; the I/O itself is
//! plain `tokio::fs` once authorized.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Host filesystem error types.
pub mod error;
/// The gated filesystem.
pub mod gated;

pub use error::{HostFsError, HostFsResult};
pub use gated::GatedFs;
