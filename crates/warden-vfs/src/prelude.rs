//! Prelude module - commonly used types for convenient import.
//!
//! Use `use warden_vfs::prelude::*;` to import all essential types.

// Errors
pub use crate::{VfsError, VfsResult};

// Engine
pub use crate::{SharedVfs, Vfs, VfsSettings};

// Authority
pub use crate::{AccessRequest, Action, AllowAll, Authority, RequestExtra};

// Tree and metadata
pub use crate::{Flag, Flags, FsTable, Node, NodeKind, TableEntry};

// Snapshots
pub use crate::{FolderSnapshot, Snapshot};
