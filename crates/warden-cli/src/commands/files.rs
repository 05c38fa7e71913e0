//! File and directory commands.

use anyhow::Result;

use super::content_or_stdin;
use crate::context::Context;
use crate::store::Store;
use crate::theme::Theme;

pub(crate) fn list(ctx: &Context, path: &str, all: bool) -> Result<()> {
    let store = Store::open(ctx)?;
    let fs = store.vfs();
    let dir = fs.normalize(path);
    let sep = fs.separator();
    for name in fs.read_dir(path, all)? {
        let child = fs.render(&dir.join(&name));
        if fs.dir_exists(&child) {
            println!("{}", Theme::directory(&format!("{name}{sep}")));
        } else {
            println!("{name}");
        }
    }
    Ok(())
}

pub(crate) fn cat(ctx: &Context, path: &str) -> Result<()> {
    let store = Store::open(ctx)?;
    print!("{}", store.vfs().read_file(path)?);
    Ok(())
}

pub(crate) fn write(ctx: &Context, path: &str, content: Option<String>) -> Result<()> {
    let content = content_or_stdin(content)?;
    let mut store = Store::open(ctx)?;
    store.vfs_mut().write_file(path, &content)?;
    store.save()
}

pub(crate) fn append(
    ctx: &Context,
    path: &str,
    content: Option<String>,
    no_newline: bool,
) -> Result<()> {
    let content = content_or_stdin(content)?;
    let mut store = Store::open(ctx)?;
    store.vfs_mut().append_file(path, &content, no_newline)?;
    store.save()
}

pub(crate) fn touch(ctx: &Context, path: &str) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().touch_file(path)?;
    store.save()
}

pub(crate) fn mkdir(ctx: &Context, path: &str) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().mkdir(path)?;
    store.save()
}

pub(crate) fn remove(ctx: &Context, path: &str) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().remove_file(path)?;
    store.save()
}

pub(crate) fn remove_dir(ctx: &Context, path: &str, recursive: bool) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().remove_tree(path, recursive)?;
    store.save()
}

pub(crate) fn copy(ctx: &Context, src: &str, dst: &str) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().copy_file(src, dst)?;
    store.save()
}

pub(crate) fn move_file(ctx: &Context, src: &str, dst: &str) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().move_file(src, dst)?;
    store.save()
}

pub(crate) fn rename(ctx: &Context, src: &str, dst: &str, strict: bool) -> Result<()> {
    let mut store = Store::open(ctx)?;
    store.vfs_mut().rename(src, dst, strict)?;
    store.save()
}
