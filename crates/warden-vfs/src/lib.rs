//! Warden VFS - capability-gated in-memory virtual filesystem.
//!
//! This crate provides:
//! - The tree store ([`Node`]) and the per-path metadata table ([`FsTable`])
//! - Item flags: hidden, read-only and undeletable
//! - The [`Authority`] hook consulted before every operation
//! - The public engine ([`Vfs`]) and its whole-store lock ([`SharedVfs`])
//! - Deep snapshots for persistence ([`Snapshot`], [`FolderSnapshot`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use warden_vfs::{AccessRequest, Action, Flag, Vfs};
//!
//! let no_removals = |req: &AccessRequest<'_>| req.action != Action::FileRemove;
//! let mut fs = Vfs::new();
//! fs.mkdir("/docs").unwrap();
//! fs.write_file("/docs/readme.txt", "hello").unwrap();
//! fs.add_flag("/docs/readme.txt", Flag::Hidden).unwrap();
//!
//! assert!(fs.read_dir("/docs", false).unwrap().is_empty());
//!
//! fs.set_authority(Some(Arc::new(no_removals)));
//! assert!(fs.remove_file("/docs/readme.txt").is_err());
//! assert_eq!(fs.read_file("/docs/readme.txt").unwrap(), "hello");
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod authority;
pub mod engine;
/// Virtual filesystem error types.
pub mod error;
pub mod flags;
pub mod node;
pub mod settings;
pub mod shared;
pub mod snapshot;
pub mod table;

pub use authority::{AccessRequest, Action, AllowAll, Authority, RequestExtra, UnknownAction};
pub use engine::Vfs;
pub use error::{VfsError, VfsResult};
pub use flags::{Flag, Flags, UnknownFlag};
pub use node::{Node, NodeKind};
pub use settings::{DEFAULT_FORBIDDEN_CHARS, VfsSettings};
pub use shared::SharedVfs;
pub use snapshot::{FolderSnapshot, Snapshot};
pub use table::{FsTable, TableEntry};
