use colored::*;

use crate::context::Context;
use docr::Result;

/// Remove one imported version, or the whole library when no version is given
pub fn remove(ctx: &Context, name: &str, version: Option<&str>) -> Result<()> {
    let removed = ctx.store.remove(name, version)?;

    println!("{} Removed {}:", "🧹".green(), name.bold());
    for version in removed {
        println!("  {} {}", "✓".green(), version);
    }

    Ok(())
}
