//! A ticket-gated store end to end: zones, folders, verbs and the two-path
//! checks on copy and move.

use std::sync::Arc;

use warden_core::VfsPath;
use warden_test::{DenyActions, RecordingAuthority, sample_vfs, ticket_for, zones_for};
use warden_tickets::{Level, Ticket, TicketAuthority, TicketError, TicketEvaluator};
use warden_vfs::{AccessRequest, Action, RequestExtra, Vfs, VfsError};

fn alice_store(ticket: Ticket) -> Vfs {
    let authority = TicketAuthority::new(ticket, TicketEvaluator::new(zones_for("alice")));
    sample_vfs().unwrap().with_authority(Arc::new(authority))
}

#[test]
fn test_user_reads_only_own_home_and_shared() {
    let fs = alice_store(ticket_for("alice", Level::User, &["file/read", "folder/read"]));

    assert_eq!(fs.read_file("/users/alice/doc.txt").unwrap(), "alice's notes");
    assert_eq!(fs.read_file("/users/common/readme.txt").unwrap(), "shared");
    assert!(matches!(
        fs.read_file("/users/bob/doc.txt"),
        Err(VfsError::Denied { action: Action::FileRead, .. })
    ));
    assert!(fs.read_file("/sys/config").is_err());
    assert_eq!(fs.read_dir("/users/alice", false).unwrap(), vec!["doc.txt"]);
    assert!(fs.read_dir("/users", false).is_err());
}

#[test]
fn test_denied_writes_do_not_mutate() {
    let mut fs = alice_store(ticket_for("alice", Level::User, &["file/read"]));
    let before = fs.get_tree("/");
    assert!(before.is_err(), "folder/tree was never granted");

    assert!(fs.write_file("/users/alice/new.txt", "x").is_err());
    assert!(fs.remove_file("/users/alice/doc.txt").is_err());
    assert_eq!(fs.read_file("/users/alice/doc.txt").unwrap(), "alice's notes");
    assert!(fs.read_file("/users/alice/new.txt").is_err());
}

#[test]
fn test_guest_is_confined_to_shared_areas() {
    let mut fs = alice_store(ticket_for("alice", Level::Guest, &["file/write", "file/read"]));
    fs.write_file("/tmp/guest.txt", "hi").unwrap();
    fs.write_file("/users/common/note.txt", "hello").unwrap();
    assert!(fs.write_file("/users/alice/nope.txt", "x").is_err());
    assert_eq!(fs.read_file("/tmp/guest.txt").unwrap(), "hi");
}

#[test]
fn test_move_checks_both_paths() {
    let mut fs = alice_store(ticket_for("alice", Level::User, &["file/move", "file/read"]));
    fs.move_file("/users/alice/doc.txt", "/tmp/doc.txt").unwrap();
    assert_eq!(fs.read_file("/tmp/doc.txt").unwrap(), "alice's notes");

    assert!(matches!(
        fs.move_file("/tmp/doc.txt", "/users/bob/doc2.txt"),
        Err(VfsError::Denied { .. })
    ));
    assert!(fs.read_file("/tmp/doc.txt").is_ok());
}

#[test]
fn test_wildcard_ticket_passes_everything() {
    let mut fs = alice_store(Ticket::wildcard());
    fs.write_file("/sys/config", "patched").unwrap();
    fs.remove_tree("/apps", true).unwrap();
    assert!(fs.export().is_ok());
    assert!(fs.has_authority());
}

#[test]
fn test_non_filesystem_actions_need_grants() {
    let mut fs = alice_store(
        Ticket::builder(Level::User)
            .allow("*", "export")
            .allow_all("flag", ["write", "has"])
            .folder("/users/alice")
            .build(),
    );
    assert!(fs.export().is_ok());
    let snapshot = fs.export().unwrap();
    assert!(matches!(fs.import(snapshot), Err(VfsError::Denied { .. })));

    fs.add_flag("/users/alice/doc.txt", warden_vfs::Flag::Hidden)
        .unwrap();
    assert!(fs.has_flag("/users/alice/doc.txt", warden_vfs::Flag::Hidden));
    assert!(matches!(
        fs.remove_flag("/users/alice/doc.txt", warden_vfs::Flag::Hidden),
        Err(VfsError::Denied { action: Action::FlagRemove, .. })
    ));
}

#[test]
fn test_explain_names_the_reason() {
    let authority = TicketAuthority::new(
        ticket_for("alice", Level::User, &["file/copy"]),
        TicketEvaluator::new(zones_for("alice")),
    );
    let src = VfsPath::parse("/users/alice/doc.txt");
    let dst = VfsPath::parse("/users/bob/doc.txt");
    let request = AccessRequest {
        action: Action::FileCopy,
        path: &src,
        extra: RequestExtra::Destination(&dst),
    };
    assert_eq!(
        authority.explain(&request),
        Err(TicketError::OutsideAccessibleFolders("/users/bob/doc.txt".to_owned()))
    );
}

#[test]
fn test_authority_sees_normalized_paths_in_order() {
    let recorder = RecordingAuthority::new();
    let mut fs = sample_vfs()
        .unwrap()
        .with_authority(Arc::new(recorder.clone()));
    fs.chdir("/users/alice").unwrap();
    fs.write_file("../bob/./x.txt", "x").unwrap();
    fs.copy_file("doc.txt", "/tmp/copy.txt").unwrap();

    let calls = recorder.calls();
    assert_eq!(
        recorder.actions(),
        vec![Action::FolderCwd, Action::FileWrite, Action::FileCopy]
    );
    assert_eq!(calls[1].path, VfsPath::parse("/users/bob/x.txt"));
    assert_eq!(calls[2].path, VfsPath::parse("/users/alice/doc.txt"));
    assert_eq!(calls[2].destination, Some(VfsPath::parse("/tmp/copy.txt")));
}

#[test]
fn test_denying_authority_blocks_without_side_effects() {
    let recorder = RecordingAuthority::denying();
    let mut fs = sample_vfs()
        .unwrap()
        .with_authority(Arc::new(recorder.clone()));
    assert!(fs.mkdir("/new").is_err());
    assert!(!fs.exists("/users"));
    assert!(!fs.has_authority());
    assert_eq!(recorder.count(Action::FolderMake), 1);

    fs.set_authority(None);
    assert!(!fs.exists("/new"));
    assert!(fs.exists("/users"));
}

#[test]
fn test_selective_denial() {
    let mut fs = sample_vfs()
        .unwrap()
        .with_authority(Arc::new(DenyActions::new([Action::FileRemove]).and(Action::FolderRemove)));
    fs.write_file("/tmp/a.txt", "a").unwrap();
    assert!(matches!(
        fs.remove_file("/tmp/a.txt"),
        Err(VfsError::Denied { action: Action::FileRemove, .. })
    ));
    assert!(fs.remove_tree("/tmp", true).is_err());
    fs.rename("/tmp/a.txt", "/tmp/b.txt", false).unwrap();
    assert!(fs.file_exists("/tmp/b.txt"));
}
