use thiserror::Error;

use crate::ticket::Level;

/// Reasons a ticket refuses an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// The action token is not of the form `group/verb`.
    #[error("Malformed action token: {0:?}")]
    MalformedAction(String),

    /// The ticket does not list the verb under the group.
    #[error("Ticket does not grant {group}/{verb}")]
    PermissionNotGranted {
        /// Action group.
        group: String,
        /// Action verb.
        verb: String,
    },

    /// No accessible folder contains the path.
    #[error("Path {0} is outside the ticket's accessible folders")]
    OutsideAccessibleFolders(String),

    /// The path's zone requires a higher level than the ticket holds.
    #[error("Path {path} requires level {required}, ticket holds {held}")]
    InsufficientLevel {
        /// The requested path.
        path: String,
        /// Level required by the zone.
        required: Level,
        /// Level held by the ticket.
        held: Level,
    },

    /// A filesystem action was checked without a path.
    #[error("Action {0} needs a path")]
    MissingPath(String),

    /// A serialized ticket could not be parsed.
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),
}

/// Result type for ticket evaluation.
pub type TicketResult<T> = Result<T, TicketError>;
