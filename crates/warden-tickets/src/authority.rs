//! The ticket-backed [`Authority`].

use tracing::debug;
use warden_vfs::{AccessRequest, Action, Authority};

use crate::error::TicketResult;
use crate::evaluator::TicketEvaluator;
use crate::ticket::Ticket;

/// Gates a [`warden_vfs::Vfs`] with a ticket.
///
/// Two-path operations (copy, move, rename) are checked on both the source
/// and the destination.
#[derive(Debug, Clone)]
pub struct TicketAuthority {
    ticket: Ticket,
    evaluator: TicketEvaluator,
}

impl TicketAuthority {
    /// Gate with `ticket`, evaluated under `evaluator`'s zones.
    #[must_use]
    pub fn new(ticket: Ticket, evaluator: TicketEvaluator) -> Self {
        Self { ticket, evaluator }
    }

    /// The ticket in force.
    #[must_use]
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// The evaluator in use.
    #[must_use]
    pub fn evaluator(&self) -> &TicketEvaluator {
        &self.evaluator
    }

    /// The reason a request would be refused, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failing check for the source or destination path.
    pub fn explain(&self, request: &AccessRequest<'_>) -> TicketResult<()> {
        if request.action == Action::AgentExist {
            return Ok(());
        }
        let action = request.action.as_str();
        self.evaluator
            .check(&self.ticket, action, Some(request.path))?;
        if let Some(dest) = request.destination() {
            self.evaluator.check(&self.ticket, action, Some(dest))?;
        }
        Ok(())
    }
}

impl Authority for TicketAuthority {
    fn check(&self, request: &AccessRequest<'_>) -> bool {
        match self.explain(request) {
            Ok(()) => true,
            Err(reason) => {
                debug!(action = %request.action, path = %request.path, %reason, "Ticket refused request");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_core::VfsPath;
    use warden_vfs::{RequestExtra, Vfs, VfsError};

    use super::*;
    use crate::ticket::Level;
    use crate::zone::ZoneRules;

    fn gated(ticket: Ticket) -> Vfs {
        let mut fs = Vfs::new();
        for dir in ["/users", "/users/alice", "/users/bob", "/tmp"] {
            fs.mkdir(dir).unwrap();
        }
        fs.write_file("/users/alice/doc.txt", "mine").unwrap();
        fs.write_file("/users/bob/doc.txt", "his").unwrap();
        let authority = TicketAuthority::new(ticket, TicketEvaluator::new(ZoneRules::for_user("alice")));
        fs.with_authority(Arc::new(authority))
    }

    #[test]
    fn test_gates_vfs_reads() {
        let ticket = Ticket::builder(Level::User)
            .allow("file", "read")
            .folder("/users/alice")
            .build();
        let fs = gated(ticket);
        assert_eq!(fs.read_file("/users/alice/doc.txt").unwrap(), "mine");
        assert!(matches!(
            fs.read_file("/users/bob/doc.txt"),
            Err(VfsError::Denied { .. })
        ));
        assert!(fs.has_authority());
    }

    #[test]
    fn test_destination_is_checked() {
        let ticket = Ticket::builder(Level::Admin)
            .allow("file", "copy")
            .folder("/users/alice")
            .build();
        let mut fs = gated(ticket);
        fs.copy_file("/users/alice/doc.txt", "/users/alice/copy.txt")
            .unwrap();
        assert!(fs
            .copy_file("/users/alice/doc.txt", "/users/bob/stolen.txt")
            .is_err());
        assert!(fs.copy_file("/users/bob/doc.txt", "/users/alice/b.txt").is_err());
    }

    #[test]
    fn test_explain_reports_reason() {
        let authority = TicketAuthority::new(
            Ticket::builder(Level::Guest).allow("file", "read").folder("/").build(),
            TicketEvaluator::default(),
        );
        let path = VfsPath::parse("/etc/passwd");
        let request = AccessRequest {
            action: Action::FileRead,
            path: &path,
            extra: RequestExtra::None,
        };
        let reason = authority.explain(&request).unwrap_err();
        assert!(reason.to_string().contains("requires level root"));
        assert!(!authority.check(&request));
    }
}
