use crate::context::Context;
use docr::{Result, log};

/// Import a version from the library's configured source, newest if none is given
pub fn add(ctx: &Context, name: &str, version: Option<&str>) -> Result<()> {
    ctx.config.ensure_dirs()?;

    let registry = ctx.registry();
    let target = registry.resolve_importable(name, version)?;
    log::debug(format!("resolved {} to version {}", name, target.name));

    if !registry.import_version(name, &target)? {
        log::info(format!(
            "{} version {} is already imported",
            name, target.name
        ));
    }

    Ok(())
}
