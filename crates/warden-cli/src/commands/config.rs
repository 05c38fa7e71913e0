//! `warden config show`.

use anyhow::{Result, bail};
use warden_config::{ResolvedConfig, ShowFormat};

use crate::context::Context;

pub(crate) fn show(ctx: &Context, format: &str) -> Result<()> {
    let Some(format) = ShowFormat::from_name(format) else {
        bail!("unknown format {format:?} (expected toml, json, or sources)");
    };
    let rendered = match &ctx.resolved {
        Some(resolved) => resolved.render(format)?,
        // A single --config file has no layer provenance.
        None => ResolvedConfig {
            config: ctx.config.clone(),
            field_sources: warden_config::FieldSources::new(),
            loaded_files: Vec::new(),
        }
        .render(format)?,
    };
    print!("{rendered}");
    if let Some(resolved) = &ctx.resolved
        && !resolved.loaded_files.is_empty()
    {
        eprintln!("# loaded: {}", resolved.loaded_files.join(", "));
    }
    Ok(())
}
