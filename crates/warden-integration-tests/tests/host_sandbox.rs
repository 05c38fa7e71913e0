//! The gated host filesystem driven by a ticket and zone rules loaded from
//! configuration.

use std::path::Path;

use tempfile::TempDir;
use warden_config::Config;
use warden_core::VfsPath;
use warden_hostfs::{GatedFs, HostFsError};
use warden_test::ticket_for;
use warden_tickets::{Level, TicketEvaluator, ZoneRules};

fn host_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for sub in ["home/carol", "home/dave", "scratch", "etc"] {
        std::fs::create_dir_all(dir.path().join(sub)).unwrap();
    }
    std::fs::write(dir.path().join("home/carol/todo.txt"), "buy milk").unwrap();
    std::fs::write(dir.path().join("etc/passwd"), "root:x:0:0").unwrap();
    dir
}

fn zones_from(config: &Config) -> ZoneRules {
    ZoneRules {
        common: VfsPath::parse(&config.zones.common),
        temp: VfsPath::parse(&config.zones.temp),
        users: VfsPath::parse(&config.zones.users),
        apps: VfsPath::parse(&config.zones.apps),
        username: config.zones.username.clone(),
    }
}

fn write_config(dir: &Path) {
    std::fs::write(
        dir.join("config.toml"),
        "[zones]\nusers = \"/home\"\ncommon = \"/home/shared\"\ntemp = \"/scratch\"\nusername = \"carol\"\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_configured_zones_gate_host_io() {
    let home = tempfile::tempdir().unwrap();
    write_config(home.path());
    let config = Config::load_with_home(None, home.path()).unwrap().config;
    let zones = zones_from(&config);
    assert_eq!(zones.home(), Some(VfsPath::parse("/home/carol")));

    let host = host_tree();
    let ticket = warden_tickets::Ticket::builder(Level::User)
        .allow_all("file", ["read", "write"])
        .allow("folder", "read")
        .folder("/home/carol")
        .folder("/scratch")
        .folder("/etc")
        .build();
    let fs = GatedFs::new(host.path(), "/home/carol", ticket, TicketEvaluator::new(zones));

    // `/etc` needs root and is pruned up front.
    assert_eq!(fs.ticket().accessible_folders.len(), 2);

    assert_eq!(fs.read_file("todo.txt").await.unwrap(), "buy milk");
    fs.write_file("/scratch/out.txt", "done").await.unwrap();
    assert_eq!(
        std::fs::read_to_string(host.path().join("scratch/out.txt")).unwrap(),
        "done"
    );
    assert_eq!(fs.read_folder(".").await.unwrap(), vec!["todo.txt"]);

    assert!(matches!(
        fs.read_file("/etc/passwd").await,
        Err(HostFsError::Denied { .. })
    ));
    assert!(matches!(
        fs.read_folder("/home/dave").await,
        Err(HostFsError::Denied { .. })
    ));
}

#[tokio::test]
async fn test_dot_dot_cannot_leave_the_root() {
    let host = host_tree();
    let fs = GatedFs::new(
        host.path().join("home"),
        "/",
        ticket_for("carol", Level::Root, &["file/read", "file/write"]),
        TicketEvaluator::new(ZoneRules::for_user("carol")),
    );
    assert_eq!(fs.make_absolute("../../../etc/passwd"), "/etc/passwd");
    assert!(fs.read_file("../../../etc/passwd").await.is_err());
    assert!(!fs.exists("/etc/passwd").await);
    assert!(fs.dir_exists("/carol").await);
}

#[tokio::test]
async fn test_rename_and_remove_need_grants() {
    let host = host_tree();
    let mut fs = GatedFs::new(
        host.path(),
        "/",
        warden_tickets::Ticket::builder(Level::User)
            .allow_all("file", ["rename", "remove", "write"])
            .allow("folder", "make")
            .folder("/home/carol")
            .build(),
        TicketEvaluator::new(ZoneRules {
            users: VfsPath::parse("/home"),
            ..ZoneRules::for_user("carol")
        }),
    );
    fs.chdir("/home/carol").await.unwrap();

    fs.rename("todo.txt", "done.txt", true).await.unwrap();
    assert!(fs.file_exists("done.txt").await);
    assert!(matches!(
        fs.rename("done.txt", "other.txt", false).await,
        Err(HostFsError::Denied { .. })
    ));

    fs.make_folder("archive").await.unwrap();
    fs.append_file("archive/log.txt", "one").await.unwrap();
    fs.append_file("archive/log.txt", "two").await.unwrap();
    assert_eq!(
        std::fs::read_to_string(host.path().join("home/carol/archive/log.txt")).unwrap(),
        "onetwo"
    );
    fs.remove_file("archive/log.txt").await.unwrap();
    assert!(!fs.exists("archive/log.txt").await);
}
