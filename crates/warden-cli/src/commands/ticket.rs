//! Ticket inspection and construction.

use anyhow::{Context as _, Result, bail};
use warden_core::{VfsPath, normalize};
use warden_tickets::{Level, Ticket};

use crate::context::Context;
use crate::theme::Theme;

fn absolute(ctx: &Context, path: &str) -> VfsPath {
    let sep = ctx.config.engine.separator.chars().next().unwrap_or('/');
    normalize(path, &VfsPath::root(), sep)
}

pub(crate) fn check(ctx: &Context, action: &str, path: &str) -> Result<()> {
    let ticket = ctx.require_ticket()?;
    let target = absolute(ctx, path);
    match ctx.evaluator().check(ticket, action, Some(&target)) {
        Ok(()) => println!("{}", Theme::success(&format!("{action} allowed on {target}"))),
        Err(reason) => println!("{}", Theme::error(&format!("{action} denied: {reason}"))),
    }
    Ok(())
}

pub(crate) fn level(ctx: &Context, path: &str) -> Result<()> {
    let target = absolute(ctx, path);
    let zones = ctx.zones();
    let zone = zones.zone(&target);
    println!("{}", Theme::header(&target.to_string()));
    println!("  Zone:  {zone}");
    println!("  Level: {}", Theme::info(zone.required_level().as_str()));
    Ok(())
}

pub(crate) fn build(level: &str, allow: &[String], folders: &[String], wildcard: bool) -> Result<()> {
    let level: Level = level.parse()?;
    let mut builder = Ticket::builder(level);
    for token in allow {
        let Some((group, verb)) = token.split_once('/') else {
            bail!("permission {token:?} must look like group/verb");
        };
        if group.is_empty() || verb.is_empty() {
            bail!("permission {token:?} must look like group/verb");
        }
        builder = builder.allow(group, verb);
    }
    for folder in folders {
        builder = builder.folder(folder);
    }
    if wildcard {
        builder = builder.wildcard();
    }
    let json = builder.build().to_json().context("serializing ticket")?;
    println!("{json}");
    Ok(())
}
