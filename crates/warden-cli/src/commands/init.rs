//! Init command: create a new store.

use anyhow::Result;

use crate::context::Context;
use crate::store::Store;
use crate::theme::Theme;

/// Create the store, optionally with the zone roots in place.
pub(crate) fn run_init(ctx: &Context, force: bool, layout: bool) -> Result<()> {
    let mut store = Store::create(ctx, force)?;

    if layout {
        let zones = &ctx.config.zones;
        let fs = store.vfs_mut();
        for root in [&zones.users, &zones.common, &zones.temp, &zones.apps] {
            // Roots may nest; create missing ancestors first.
            let path = fs.normalize(root);
            let mut current = warden_core::VfsPath::root();
            for segment in path.segments() {
                current = current.join(segment);
                let rendered = fs.render(&current);
                if !fs.exists(&rendered) {
                    fs.mkdir(&rendered)?;
                }
            }
        }
        if let Some(home) = ctx.zones().home() {
            let rendered = fs.render(&home);
            if !fs.exists(&rendered) {
                fs.mkdir(&rendered)?;
            }
        }
    }

    let path = store.path().display().to_string();
    store.save()?;
    println!("{}", Theme::success(&format!("Initialized store at {path}")));
    Ok(())
}
