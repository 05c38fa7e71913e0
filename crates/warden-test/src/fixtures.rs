//! Sample stores and tickets.

use warden_tickets::{Level, Ticket, ZoneRules};
use warden_vfs::{Vfs, VfsResult};

/// Directories created by [`sample_vfs`].
pub const SAMPLE_DIRS: [&str; 7] = [
    "/users",
    "/users/alice",
    "/users/bob",
    "/users/common",
    "/tmp",
    "/apps",
    "/sys",
];

/// Files created by [`sample_vfs`], with their content.
pub const SAMPLE_FILES: [(&str, &str); 5] = [
    ("/users/alice/doc.txt", "alice's notes"),
    ("/users/bob/doc.txt", "bob's notes"),
    ("/users/common/readme.txt", "shared"),
    ("/apps/editor", "binary"),
    ("/sys/config", "root only"),
];

/// A small multi-user tree with no authority attached.
///
/// # Errors
///
/// Fails only if the engine rejects one of the fixture paths.
pub fn sample_vfs() -> VfsResult<Vfs> {
    let mut fs = Vfs::new();
    for dir in SAMPLE_DIRS {
        fs.mkdir(dir)?;
    }
    for (path, content) in SAMPLE_FILES {
        fs.write_file(path, content)?;
    }
    Ok(fs)
}

/// Zone rules with the default roots for `username`.
#[must_use]
pub fn zones_for(username: &str) -> ZoneRules {
    ZoneRules::for_user(username)
}

/// A ticket at `level` granting `actions` (`group/verb` tokens) over the
/// user's home plus the shared and temporary areas.
///
/// Tokens without a `/` are ignored.
#[must_use]
pub fn ticket_for(username: &str, level: Level, actions: &[&str]) -> Ticket {
    let zones = zones_for(username);
    let mut builder = Ticket::builder(level);
    for token in actions {
        if let Some((group, verb)) = token.split_once('/') {
            builder = builder.allow(group, verb);
        }
    }
    if let Some(home) = zones.home() {
        builder = builder.folder(&home.to_string());
    }
    builder
        .folder(&zones.common.to_string())
        .folder(&zones.temp.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use warden_core::VfsPath;

    use super::*;

    #[test]
    fn test_sample_vfs() {
        let fs = sample_vfs().unwrap();
        assert!(fs.dir_exists("/users/common"));
        assert_eq!(fs.read_file("/sys/config").unwrap(), "root only");
    }

    #[test]
    fn test_ticket_for() {
        let ticket = ticket_for("alice", Level::User, &["file/read", "bogus", "folder/read"]);
        assert!(ticket.grants("file", "read"));
        assert!(ticket.grants("folder", "read"));
        assert!(!ticket.grants("file", "write"));
        assert_eq!(
            ticket.accessible_folders,
            vec![
                VfsPath::parse("/users/alice"),
                VfsPath::parse("/users/common"),
                VfsPath::parse("/tmp"),
            ]
        );
    }
}
