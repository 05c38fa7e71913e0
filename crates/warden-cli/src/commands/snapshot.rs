//! Folder export and import.

use std::path::Path;

use anyhow::{Context as _, Result};
use warden_vfs::FolderSnapshot;

use crate::context::Context;
use crate::store::Store;
use crate::theme::Theme;

pub(crate) fn export_folder(ctx: &Context, path: &str, out: Option<&Path>) -> Result<()> {
    let store = Store::open(ctx)?;
    let json = store.vfs().export_folder(path)?.to_json()?;
    match out {
        Some(file) => {
            std::fs::write(file, json).with_context(|| format!("writing {}", file.display()))?;
            println!(
                "{}",
                Theme::success(&format!("Exported {path} to {}", file.display()))
            );
        },
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn import_folder(
    ctx: &Context,
    file: &Path,
    dest: Option<&str>,
    force: bool,
) -> Result<()> {
    let json =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let snapshot = FolderSnapshot::from_json(&json)?;
    let target = dest.map_or_else(|| snapshot.path.clone(), str::to_owned);

    let mut store = Store::open(ctx)?;
    store.vfs_mut().import_folder(snapshot, dest, force)?;
    store.save()?;
    println!("{}", Theme::success(&format!("Imported folder at {target}")));
    Ok(())
}
