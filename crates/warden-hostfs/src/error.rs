use thiserror::Error;
use warden_tickets::TicketError;

/// Errors from the gated host filesystem.
#[derive(Debug, Error)]
pub enum HostFsError {
    /// The ticket refused the operation.
    #[error("Access denied: {action} on {path}: {reason}")]
    Denied {
        /// The action token.
        action: String,
        /// The virtual path.
        path: String,
        /// Why the ticket refused.
        #[source]
        reason: TicketError,
    },

    /// A symlink would lead outside the root.
    #[error("Path resolves outside sandbox boundaries: {0}")]
    SandboxViolation(String),

    /// A directory was required.
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The rename destination already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Underlying I/O failure, tagged with the virtual path.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The virtual path.
        path: String,
        /// The host error.
        #[source]
        source: std::io::Error,
    },
}

impl HostFsError {
    pub(crate) fn io(path: &warden_core::VfsPath) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_string(),
            source,
        }
    }
}

/// Convenience result type for host filesystem operations.
pub type HostFsResult<T> = Result<T, HostFsError>;
