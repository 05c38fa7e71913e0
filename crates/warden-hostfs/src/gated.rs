use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use warden_core::{DEFAULT_SEPARATOR, VfsPath, normalize};
use warden_tickets::{Ticket, TicketEvaluator};
use warden_vfs::Action;

use crate::error::{HostFsError, HostFsResult};

/// A host directory exposed under a virtual namespace and gated by a ticket.
///
/// Virtual paths are normalized before authorization and before I/O, so
/// `..` can never climb above the root. Existence probes are not gated.
#[derive(Debug, Clone)]
pub struct GatedFs {
    root: PathBuf,
    cwd: VfsPath,
    ticket: Ticket,
    evaluator: TicketEvaluator,
}

impl GatedFs {
    /// Expose `root`, starting in `cwd`, for `ticket`.
    ///
    /// Accessible folders the ticket's level can never reach are pruned.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        cwd: &str,
        mut ticket: Ticket,
        evaluator: TicketEvaluator,
    ) -> Self {
        let pruned = evaluator.prune_folders(&mut ticket);
        let root = root.into();
        info!(
            root = %root.display(),
            level = %ticket.level,
            pruned,
            "Gated filesystem ready"
        );
        Self {
            root,
            cwd: VfsPath::parse(cwd),
            ticket,
            evaluator,
        }
    }

    /// The ticket in force, after pruning.
    #[must_use]
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// The host directory backing the root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the current directory.
    #[must_use]
    pub fn normalize(&self, path: &str) -> VfsPath {
        normalize(path, &self.cwd, DEFAULT_SEPARATOR)
    }

    /// Absolute virtual form of `path`.
    #[must_use]
    pub fn make_absolute(&self, path: &str) -> String {
        self.normalize(path).to_string()
    }

    /// The current directory.
    #[must_use]
    pub fn cwd(&self) -> &VfsPath {
        &self.cwd
    }

    /// Change the current directory. Not gated; the target must be an
    /// existing directory.
    ///
    /// # Errors
    ///
    /// Fails if the target is missing or not a directory.
    pub async fn chdir(&mut self, path: &str) -> HostFsResult<()> {
        let vpath = self.normalize(path);
        let host = self.resolve(&vpath).await?;
        let meta = fs::metadata(&host).await.map_err(HostFsError::io(&vpath))?;
        if !meta.is_dir() {
            return Err(HostFsError::NotADirectory(vpath.to_string()));
        }
        self.cwd = vpath;
        Ok(())
    }

    fn authorize(&self, action: Action, path: &VfsPath) -> HostFsResult<()> {
        self.evaluator
            .check(&self.ticket, action.as_str(), Some(path))
            .map_err(|reason| {
                warn!(action = %action, path = %path, %reason, "Ticket refused host operation");
                HostFsError::Denied {
                    action: action.as_str().to_owned(),
                    path: path.to_string(),
                    reason,
                }
            })
    }

    fn host_path(&self, vpath: &VfsPath) -> PathBuf {
        let mut out = self.root.clone();
        out.extend(vpath.segments());
        out
    }

    /// Map to a host path, refusing symlinks anywhere along the existing
    /// part of it.
    async fn resolve(&self, vpath: &VfsPath) -> HostFsResult<PathBuf> {
        let resolved = self.host_path(vpath);
        let canonical_root = fs::canonicalize(&self.root)
            .await
            .unwrap_or_else(|_| self.root.clone());

        let mut current = resolved.clone();
        let mut missing = Vec::new();
        loop {
            if let Ok(meta) = fs::symlink_metadata(&current).await {
                if meta.is_symlink() {
                    return Err(HostFsError::SandboxViolation(vpath.to_string()));
                }
                let canonical = fs::canonicalize(&current)
                    .await
                    .map_err(HostFsError::io(vpath))?;
                if !canonical.starts_with(&canonical_root) {
                    return Err(HostFsError::SandboxViolation(vpath.to_string()));
                }
                let mut out = canonical;
                for name in missing.into_iter().rev() {
                    out.push(name);
                }
                return Ok(out);
            }
            match (current.parent(), current.file_name()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.to_owned());
                    current = parent.to_path_buf();
                },
                _ => break,
            }
        }
        Ok(resolved)
    }

    async fn probe(&self, path: &str) -> Option<std::fs::Metadata> {
        let host = self.resolve(&self.normalize(path)).await.ok()?;
        fs::metadata(&host).await.ok()
    }

    /// True if anything exists at `path`.
    pub async fn exists(&self, path: &str) -> bool {
        self.probe(path).await.is_some()
    }

    /// True if a file exists at `path`.
    pub async fn file_exists(&self, path: &str) -> bool {
        self.probe(path).await.is_some_and(|meta| meta.is_file())
    }

    /// True if a directory exists at `path`.
    pub async fn dir_exists(&self, path: &str) -> bool {
        self.probe(path).await.is_some_and(|meta| meta.is_dir())
    }

    /// Read a file as UTF-8 text. Requires `file/read`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error.
    pub async fn read_file(&self, path: &str) -> HostFsResult<String> {
        let vpath = self.normalize(path);
        self.authorize(Action::FileRead, &vpath)?;
        let host = self.resolve(&vpath).await?;
        fs::read_to_string(&host)
            .await
            .map_err(HostFsError::io(&vpath))
    }

    /// Create or replace a file. Requires `file/write`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error.
    pub async fn write_file(&self, path: &str, content: &str) -> HostFsResult<()> {
        let vpath = self.normalize(path);
        self.authorize(Action::FileWrite, &vpath)?;
        let host = self.resolve(&vpath).await?;
        fs::write(&host, content)
            .await
            .map_err(HostFsError::io(&vpath))?;
        debug!(path = %vpath, bytes = content.len(), "Wrote host file");
        Ok(())
    }

    /// Append to a file, creating it if absent. Requires `file/write`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error.
    pub async fn append_file(&self, path: &str, content: &str) -> HostFsResult<()> {
        let vpath = self.normalize(path);
        self.authorize(Action::FileWrite, &vpath)?;
        let host = self.resolve(&vpath).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&host)
            .await
            .map_err(HostFsError::io(&vpath))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(HostFsError::io(&vpath))?;
        file.flush().await.map_err(HostFsError::io(&vpath))
    }

    /// Remove a file. Requires `file/remove`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error.
    pub async fn remove_file(&self, path: &str) -> HostFsResult<()> {
        let vpath = self.normalize(path);
        self.authorize(Action::FileRemove, &vpath)?;
        let host = self.resolve(&vpath).await?;
        fs::remove_file(&host)
            .await
            .map_err(HostFsError::io(&vpath))?;
        debug!(path = %vpath, "Removed host file");
        Ok(())
    }

    /// Create a directory. Requires `folder/make`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error (including an existing entry).
    pub async fn make_folder(&self, path: &str) -> HostFsResult<()> {
        let vpath = self.normalize(path);
        self.authorize(Action::FolderMake, &vpath)?;
        let host = self.resolve(&vpath).await?;
        fs::create_dir(&host)
            .await
            .map_err(HostFsError::io(&vpath))
    }

    /// Names inside a directory, sorted. Requires `folder/read`.
    ///
    /// # Errors
    ///
    /// Fails if refused or on I/O error.
    pub async fn read_folder(&self, path: &str) -> HostFsResult<Vec<String>> {
        let vpath = self.normalize(path);
        self.authorize(Action::FolderRead, &vpath)?;
        let host = self.resolve(&vpath).await?;
        let mut read_dir = fs::read_dir(&host)
            .await
            .map_err(HostFsError::io(&vpath))?;
        let mut names = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(HostFsError::io(&vpath))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Move a file or directory.
    ///
    /// Non-strict mode requires both `file/rename` and `folder/rename` on
    /// both paths; strict mode checks the item type first and requires only
    /// the matching permission.
    ///
    /// # Errors
    ///
    /// Fails if refused, if the destination exists, or on I/O error.
    pub async fn rename(&self, path: &str, new_path: &str, strict: bool) -> HostFsResult<()> {
        let from = self.normalize(path);
        let to = self.normalize(new_path);
        let actions: &[Action] = if strict {
            let host = self.resolve(&from).await?;
            let meta = fs::metadata(&host).await.map_err(HostFsError::io(&from))?;
            if meta.is_dir() {
                &[Action::FolderRename]
            } else {
                &[Action::FileRename]
            }
        } else {
            &[Action::FileRename, Action::FolderRename]
        };
        for &action in actions {
            self.authorize(action, &from)?;
            self.authorize(action, &to)?;
        }

        let host_from = self.resolve(&from).await?;
        let host_to = self.resolve(&to).await?;
        if fs::try_exists(&host_to).await.unwrap_or(false) {
            return Err(HostFsError::AlreadyExists(to.to_string()));
        }
        fs::rename(&host_from, &host_to)
            .await
            .map_err(HostFsError::io(&from))?;
        debug!(from = %from, to = %to, "Renamed host item");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use warden_tickets::{Level, TicketError, ZoneRules};

    use super::*;

    async fn sandbox(ticket: Ticket) -> (TempDir, GatedFs) {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["users/alice", "users/bob", "tmp", "sys"] {
            fs::create_dir_all(dir.path().join(sub)).await.unwrap();
        }
        fs::write(dir.path().join("users/bob/secret.txt"), "bob")
            .await
            .unwrap();
        let gated = GatedFs::new(
            dir.path(),
            "/users/alice",
            ticket,
            TicketEvaluator::new(ZoneRules::for_user("alice")),
        );
        (dir, gated)
    }

    fn alice() -> Ticket {
        Ticket::builder(Level::User)
            .allow_all("file", ["read", "write", "remove", "rename"])
            .allow_all("folder", ["make", "read", "rename"])
            .folder("/users/alice")
            .folder("/tmp")
            .folder("/sys")
            .build()
    }

    #[tokio::test]
    async fn test_new_prunes_unreachable_folders() {
        let (_dir, gated) = sandbox(alice()).await;
        assert_eq!(
            gated.ticket().accessible_folders,
            vec![VfsPath::parse("/users/alice"), VfsPath::parse("/tmp")]
        );
    }

    #[tokio::test]
    async fn test_write_read_append() {
        let (dir, gated) = sandbox(alice()).await;
        gated.write_file("notes.txt", "one").await.unwrap();
        gated.append_file("/users/alice/notes.txt", "two").await.unwrap();
        assert_eq!(gated.read_file("notes.txt").await.unwrap(), "onetwo");
        assert!(dir.path().join("users/alice/notes.txt").exists());
        assert!(gated.file_exists("notes.txt").await);
        assert!(!gated.dir_exists("notes.txt").await);
    }

    #[tokio::test]
    async fn test_other_home_is_refused() {
        let (_dir, gated) = sandbox(alice()).await;
        assert!(gated.exists("/users/bob/secret.txt").await);
        let err = gated.read_file("../bob/secret.txt").await.unwrap_err();
        assert!(matches!(
            err,
            HostFsError::Denied {
                reason: TicketError::OutsideAccessibleFolders(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_dotdot_cannot_escape_root() {
        let (_dir, gated) = sandbox(Ticket::wildcard()).await;
        assert_eq!(gated.make_absolute("../../../../etc/passwd"), "/etc/passwd");
        assert!(gated.read_file("../../../../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_folders_and_rename() {
        let (_dir, gated) = sandbox(alice()).await;
        gated.make_folder("docs").await.unwrap();
        gated.write_file("docs/a.txt", "a").await.unwrap();
        assert_eq!(gated.read_folder("docs").await.unwrap(), vec!["a.txt"]);

        gated.rename("docs/a.txt", "docs/b.txt", true).await.unwrap();
        assert!(gated.file_exists("docs/b.txt").await);
        gated.rename("docs", "archive", false).await.unwrap();
        assert!(gated.dir_exists("/users/alice/archive").await);

        gated.write_file("c.txt", "c").await.unwrap();
        assert!(matches!(
            gated.rename("c.txt", "archive", true).await,
            Err(HostFsError::AlreadyExists(_))
        ));
        gated.remove_file("c.txt").await.unwrap();
        assert!(!gated.exists("c.txt").await);
    }

    #[tokio::test]
    async fn test_strict_rename_needs_only_matching_permission() {
        let ticket = Ticket::builder(Level::User)
            .allow_all("file", ["write", "rename"])
            .folder("/users/alice")
            .build();
        let (_dir, gated) = sandbox(ticket).await;
        gated.write_file("x", "x").await.unwrap();
        assert!(gated.rename("x", "y", false).await.is_err());
        gated.rename("x", "y", true).await.unwrap();
    }

    #[tokio::test]
    async fn test_chdir() {
        let (_dir, mut gated) = sandbox(alice()).await;
        gated.chdir("/tmp").await.unwrap();
        assert_eq!(gated.cwd(), &VfsPath::parse("/tmp"));
        gated.write_file("scratch", "s").await.unwrap();
        assert!(matches!(
            gated.chdir("scratch").await,
            Err(HostFsError::NotADirectory(_))
        ));
        assert!(gated.chdir("/nowhere").await.is_err());
    }
}
