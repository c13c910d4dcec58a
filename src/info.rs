use colored::*;

use crate::context::Context;
use crate::render::display_symbol;
use docr::docs::{find_symbol, suggestions};
use docr::{Result, log};

/// Look up a symbol in a library's documentation.
/// Returns `false` when nothing matched.
pub fn info(ctx: &Context, symbol: &str, library: &str, version: Option<&str>) -> Result<bool> {
    let version = ctx.registry().resolve(library, version)?;
    let lib = ctx.store.load(library, &version)?;
    log::debug(format!("searching {} {} for '{}'", library, version, symbol));

    match find_symbol(&lib.program, symbol) {
        Some(found) => {
            display_symbol(found, log::is_verbose());
            Ok(true)
        }
        None => {
            log::error(format!(
                "no documentation found for '{}' in {} {}",
                symbol, library, version
            ));

            let similar = suggestions(&lib.program, symbol);
            if similar.is_empty() {
                log::info("check the spelling, or import another version with 'docr add'");
            } else {
                println!("\n{} Did you mean one of these?\n", "ℹ️".blue());
                for name in similar {
                    println!("  {} {}", "•".cyan(), name.green());
                }
            }
            Ok(false)
        }
    }
}
