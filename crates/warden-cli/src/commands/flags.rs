//! Flag and metadata commands.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use warden_vfs::{Flags, Vfs};

use crate::context::Context;
use crate::store::Store;
use crate::theme::Theme;

fn parse_flags(letters: &str) -> Result<Flags> {
    letters
        .parse()
        .with_context(|| format!("invalid flags {letters:?} (use letters from \"hru\")"))
}

pub(crate) fn add(ctx: &Context, path: &str, letters: &str) -> Result<()> {
    let flags = parse_flags(letters)?;
    let mut store = Store::open(ctx)?;
    store.vfs_mut().add_flag(path, flags)?;
    store.save()
}

pub(crate) fn remove(ctx: &Context, path: &str, letters: &str) -> Result<()> {
    let flags = parse_flags(letters)?;
    let mut store = Store::open(ctx)?;
    store.vfs_mut().remove_flag(path, flags)?;
    store.save()
}

pub(crate) fn show(ctx: &Context, path: &str) -> Result<()> {
    let store = Store::open(ctx)?;
    let flags = store.vfs().get_flags(path)?;
    if flags.is_empty() {
        println!("{}", Theme::dimmed("(none)"));
    } else {
        let names: Vec<String> = flags.iter().map(|flag| flag.to_string()).collect();
        println!("{flags}  {}", Theme::dimmed(&names.join(", ")));
    }
    Ok(())
}

fn timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| millis.to_string(), |t| t.to_rfc3339())
}

/// Item kind from the existence probes; either may be refused by the ticket.
fn kind_of(fs: &Vfs, path: &str) -> &'static str {
    if fs.dir_exists(path) {
        "directory"
    } else if fs.file_exists(path) {
        "file"
    } else {
        "unknown"
    }
}

pub(crate) fn stat(ctx: &Context, path: &str) -> Result<()> {
    let store = Store::open(ctx)?;
    let fs = store.vfs();
    let entry = fs.get_table_entry(path)?;
    let kind = kind_of(fs, path);

    println!("{}", Theme::header(&fs.render(&fs.normalize(path))));
    println!("  Kind:     {kind}");
    println!("  Created:  {}", timestamp(entry.created_at));
    println!("  Modified: {}", timestamp(entry.modified_at));
    println!("  Flags:    {}", entry.flags);
    Ok(())
}
