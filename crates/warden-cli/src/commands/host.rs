//! Ticket-gated access to a host directory.

use std::path::PathBuf;

use anyhow::{Result, bail};
use warden_hostfs::GatedFs;

use super::content_or_stdin;
use crate::context::Context;
use crate::theme::Theme;

/// Open the host directory from `--root` or `host.root`, gated by the ticket.
pub(crate) fn open(ctx: &Context, root: Option<PathBuf>) -> Result<GatedFs> {
    let Some(root) = root.or_else(|| ctx.config.host.root.as_ref().map(PathBuf::from)) else {
        bail!("no host directory; pass --root or set host.root");
    };
    if !root.is_dir() {
        bail!("host directory {} does not exist", root.display());
    }
    let ticket = ctx.require_ticket()?.clone();
    Ok(GatedFs::new(root, "/", ticket, ctx.evaluator()))
}

pub(crate) async fn list(fs: &GatedFs, path: &str) -> Result<()> {
    let dir = fs.make_absolute(path);
    for name in fs.read_folder(path).await? {
        let child = format!("{}/{name}", dir.trim_end_matches('/'));
        if fs.dir_exists(&child).await {
            println!("{}", Theme::directory(&format!("{name}/")));
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

pub(crate) async fn cat(fs: &GatedFs, path: &str) -> Result<()> {
    print!("{}", fs.read_file(path).await?);
    Ok(())
}

pub(crate) async fn write(fs: &GatedFs, path: &str, content: Option<String>) -> Result<()> {
    let content = content_or_stdin(content)?;
    fs.write_file(path, &content).await?;
    println!("{}", Theme::success(&format!("Wrote {}", fs.make_absolute(path))));
    Ok(())
}

pub(crate) async fn mkdir(fs: &GatedFs, path: &str) -> Result<()> {
    fs.make_folder(path).await?;
    println!("{}", Theme::success(&format!("Created {}", fs.make_absolute(path))));
    Ok(())
}

pub(crate) async fn remove(fs: &GatedFs, path: &str) -> Result<()> {
    fs.remove_file(path).await?;
    println!("{}", Theme::success(&format!("Removed {}", fs.make_absolute(path))));
    Ok(())
}
