//! Ticket evaluation.

use warden_core::VfsPath;

use crate::error::{TicketError, TicketResult};
use crate::ticket::{Level, Ticket};
use crate::zone::ZoneRules;

/// Action groups that address the filesystem and so need folder and zone
/// checks.
const FILESYSTEM_GROUPS: [&str; 2] = ["file", "folder"];

/// Decides whether a ticket permits an action on a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketEvaluator {
    zones: ZoneRules,
}

impl TicketEvaluator {
    /// An evaluator using `zones`.
    #[must_use]
    pub fn new(zones: ZoneRules) -> Self {
        Self { zones }
    }

    /// The zone rules in use.
    #[must_use]
    pub fn zones(&self) -> &ZoneRules {
        &self.zones
    }

    /// Level required to touch `path`.
    #[must_use]
    pub fn required_level(&self, path: &VfsPath) -> Level {
        self.zones.required_level(path)
    }

    /// Check `action` (`group/verb`) on `path` against `ticket`.
    ///
    /// Wildcard tickets always pass. Otherwise the verb must be granted for
    /// the group; for `file` and `folder` actions the path must also lie in
    /// (or be) an accessible folder and its zone level must not exceed the
    /// ticket's level.
    ///
    /// # Errors
    ///
    /// Returns the first reason the action is refused.
    pub fn check(&self, ticket: &Ticket, action: &str, path: Option<&VfsPath>) -> TicketResult<()> {
        if ticket.wildcard {
            return Ok(());
        }

        let (group, verb) = action
            .split_once('/')
            .filter(|(group, verb)| !group.is_empty() && !verb.is_empty())
            .ok_or_else(|| TicketError::MalformedAction(action.to_owned()))?;

        if !ticket.grants(group, verb) {
            return Err(TicketError::PermissionNotGranted {
                group: group.to_owned(),
                verb: verb.to_owned(),
            });
        }

        if !FILESYSTEM_GROUPS.contains(&group) {
            return Ok(());
        }

        let path = path.ok_or_else(|| TicketError::MissingPath(action.to_owned()))?;
        if !ticket
            .accessible_folders
            .iter()
            .any(|folder| folder.is_parent_of(path, true))
        {
            return Err(TicketError::OutsideAccessibleFolders(path.to_string()));
        }

        let required = self.required_level(path);
        if required > ticket.level {
            return Err(TicketError::InsufficientLevel {
                path: path.to_string(),
                required,
                held: ticket.level,
            });
        }
        Ok(())
    }

    /// Boolean form of [`check`](Self::check).
    #[must_use]
    pub fn is_allowed(&self, ticket: &Ticket, action: &str, path: Option<&VfsPath>) -> bool {
        self.check(ticket, action, path).is_ok()
    }

    /// Drop accessible folders whose zone requires more than the ticket's
    /// level. Wildcard tickets are left alone. Returns how many were
    /// dropped.
    pub fn prune_folders(&self, ticket: &mut Ticket) -> usize {
        if ticket.wildcard {
            return 0;
        }
        let before = ticket.accessible_folders.len();
        let level = ticket.level;
        ticket
            .accessible_folders
            .retain(|folder| self.required_level(folder) <= level);
        before.saturating_sub(ticket.accessible_folders.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice_reader() -> Ticket {
        Ticket::builder(Level::User)
            .allow("file", "read")
            .folder("/users/alice")
            .build()
    }

    fn evaluator() -> TicketEvaluator {
        TicketEvaluator::new(ZoneRules::for_user("alice"))
    }

    fn p(s: &str) -> VfsPath {
        VfsPath::parse(s)
    }

    #[test]
    fn test_own_document_is_readable() {
        let doc = p("/users/alice/doc.txt");
        assert!(evaluator().is_allowed(&alice_reader(), "file/read", Some(&doc)));
    }

    #[test]
    fn test_other_home_is_outside_folders() {
        let doc = p("/users/bob/doc.txt");
        assert_eq!(
            evaluator().check(&alice_reader(), "file/read", Some(&doc)),
            Err(TicketError::OutsideAccessibleFolders("/users/bob/doc.txt".to_owned()))
        );
    }

    #[test]
    fn test_ungranted_verb_is_denied() {
        let doc = p("/users/alice/doc.txt");
        assert!(matches!(
            evaluator().check(&alice_reader(), "file/write", Some(&doc)),
            Err(TicketError::PermissionNotGranted { .. })
        ));
    }

    #[test]
    fn test_level_gate() {
        let ticket = Ticket::builder(Level::User)
            .allow("folder", "read")
            .folder("/")
            .build();
        let eval = evaluator();
        assert!(eval.is_allowed(&ticket, "folder/read", Some(&p("/tmp"))));
        assert!(eval.is_allowed(&ticket, "folder/read", Some(&p("/users/alice"))));
        assert_eq!(
            eval.check(&ticket, "folder/read", Some(&p("/apps"))),
            Err(TicketError::InsufficientLevel {
                path: "/apps".to_owned(),
                required: Level::Admin,
                held: Level::User,
            })
        );
    }

    #[test]
    fn test_non_filesystem_groups_skip_folder_checks() {
        let ticket = Ticket::builder(Level::Guest).allow("*", "export").build();
        assert!(evaluator().is_allowed(&ticket, "*/export", None));
        assert!(!evaluator().is_allowed(&ticket, "*/import", None));
    }

    #[test]
    fn test_wildcard_and_malformed() {
        let eval = evaluator();
        assert!(eval.is_allowed(&Ticket::wildcard(), "file/write", Some(&p("/sys"))));
        assert!(matches!(
            eval.check(&alice_reader(), "read", None),
            Err(TicketError::MalformedAction(_))
        ));
        assert!(matches!(
            eval.check(&alice_reader(), "file/read", None),
            Err(TicketError::MissingPath(_))
        ));
    }

    #[test]
    fn test_prune_folders() {
        let mut ticket = Ticket::builder(Level::User)
            .folder("/users/alice")
            .folder("/tmp")
            .folder("/users/bob")
            .folder("/etc")
            .build();
        assert_eq!(evaluator().prune_folders(&mut ticket), 2);
        assert_eq!(ticket.accessible_folders, vec![p("/users/alice"), p("/tmp")]);

        let mut wildcard = Ticket::wildcard();
        wildcard.accessible_folders.push(p("/etc"));
        assert_eq!(evaluator().prune_folders(&mut wildcard), 0);
    }
}
