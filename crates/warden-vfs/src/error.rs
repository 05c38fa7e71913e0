use thiserror::Error;

use crate::authority::Action;
use crate::flags::Flag;

/// Virtual filesystem errors.
///
/// Every engine operation reports failure through this type instead of
/// panicking; none of these conditions is fatal to the store.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The configured authority refused the operation.
    #[error("Access denied: {action} on {path}")]
    Denied {
        /// The action token that was refused.
        action: Action,
        /// The normalized path the action targeted.
        path: String,
    },

    /// Missing file, directory or intermediate directory.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The destination already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A directory was required but something else was found.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// A file was required but a directory was found.
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The root cannot be written, removed, renamed or flagged.
    #[error("The root directory cannot be modified")]
    RootOperation,

    /// A flag on the item blocks the operation.
    #[error("{path} is protected by the {flag} flag")]
    FlagProtected {
        /// The protected path.
        path: String,
        /// The blocking flag.
        flag: Flag,
    },

    /// Non-recursive removal of a directory that still has children.
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// The path contains a character from the forbidden set.
    #[error("Path {path} contains forbidden character {character:?}")]
    ForbiddenCharacter {
        /// The offending path.
        path: String,
        /// The forbidden character found.
        character: char,
    },

    /// The item exists but has no metadata entry.
    #[error("No table entry for {0}")]
    NoTableEntry(String),

    /// A directory cannot be moved inside itself.
    #[error("Cannot move {from} into its own subtree {to}")]
    InvalidDestination {
        /// Source path.
        from: String,
        /// Destination path.
        to: String,
    },

    /// Settings were changed after `lock()`.
    #[error("Settings are locked")]
    SettingsLocked,

    /// A settings value was rejected.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// A snapshot failed shape or consistency validation.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// A file's content is not valid JSON.
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        /// The file that was read.
        path: String,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The shared store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
}

/// Convenience result type for VFS operations.
pub type VfsResult<T> = Result<T, VfsError>;
