//! Loading and saving the snapshot file.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use tracing::debug;
use warden_vfs::{Snapshot, Vfs};

use crate::config_bridge;
use crate::context::Context;

/// A store opened from its snapshot file.
pub(crate) struct Store {
    path: PathBuf,
    vfs: Vfs,
}

impl Store {
    /// Open the snapshot, with the ticket authority attached when one was
    /// given. A configured lock is applied on top of the stored settings.
    pub(crate) fn open(ctx: &Context) -> Result<Self> {
        let path = ctx.store_path.clone();
        let json = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "reading store {} (run `warden init` to create one)",
                path.display()
            )
        })?;
        let snapshot = Snapshot::from_json(&json)
            .with_context(|| format!("parsing store {}", path.display()))?;

        let mut vfs = Vfs::new();
        vfs.import(snapshot)
            .with_context(|| format!("loading store {}", path.display()))?;
        if ctx.config.engine.lock && !vfs.is_locked() {
            vfs.lock();
        }
        vfs.set_authority(ctx.authority());
        debug!(path = %path.display(), "Opened store");
        Ok(Self { path, vfs })
    }

    /// A new, empty store with settings from the config. The authority is
    /// not attached.
    pub(crate) fn create(ctx: &Context, force: bool) -> Result<Self> {
        let path = ctx.store_path.clone();
        if path.exists() && !force {
            bail!("{} already exists (use --force to replace it)", path.display());
        }
        let settings = config_bridge::to_settings(&ctx.config).context("invalid [engine] settings")?;
        Ok(Self {
            path,
            vfs: Vfs::with_settings(settings),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub(crate) fn vfs_mut(&mut self) -> &mut Vfs {
        &mut self.vfs
    }

    /// Write the store back. The authority is detached first so saving never
    /// needs an export grant.
    pub(crate) fn save(mut self) -> Result<()> {
        self.vfs.set_authority(None);
        let json = self.vfs.export()?.to_json()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("staging snapshot in {}", dir.display()))?;
        staged.write_all(json.as_bytes())?;
        staged
            .persist(&self.path)
            .with_context(|| format!("writing store {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = json.len(), "Saved store");
        Ok(())
    }
}
