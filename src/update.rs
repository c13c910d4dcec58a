use crate::context::Context;
use docr::config::STDLIB;
use docr::{Origin, Result, log, toolchain};

/// Import the standard library docs matching the installed compiler, unless
/// they are already imported
pub fn update(ctx: &Context) -> Result<()> {
    ctx.config.ensure_dirs()?;

    let mut detected = None;
    if ctx.store.versions(STDLIB)?.is_empty() {
        log::info(format!("no {} library docs imported", STDLIB));
        log::info(format!("searching for {}...", ctx.config.toolchain));

        match toolchain::detect_version(&ctx.config.toolchain) {
            Ok(version) => {
                log::info(format!("found {} version {}", STDLIB, version));
                detected = Some(version);
            }
            Err(e) => {
                log::warn(e);
                log::info(format!("importing latest {} version docs", STDLIB));
            }
        }
    }

    let resolution = ctx
        .registry()
        .resolve_toolchain_version(STDLIB, detected.as_deref())?;

    match resolution.origin {
        Origin::Imported => log::success(format!(
            "{} version {} is up to date",
            STDLIB, resolution.version
        )),
        Origin::Detected | Origin::Fallback => log::debug(format!(
            "{} resolved to version {} ({:?})",
            STDLIB, resolution.version, resolution.origin
        )),
    }

    Ok(())
}
