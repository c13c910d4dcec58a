use colored::*;

use crate::context::Context;
use docr::{Result, log};

/// Show every imported library with its versions, latest import last
pub fn list(ctx: &Context) -> Result<()> {
    let libs = ctx.store.libraries()?;

    if libs.is_empty() {
        log::info("no libraries imported");
        log::info("run 'docr update' to import the crystal standard library");
        return Ok(());
    }

    println!("{} Imported libraries:\n", "📚".cyan());
    for (name, versions) in &libs {
        println!("{} {}", "📦".cyan(), name.bold().green());
        for (idx, version) in versions.iter().enumerate() {
            let is_last = idx == versions.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let marker = if is_last {
                format!(" {}", "(latest)".dimmed())
            } else {
                String::new()
            };
            println!("  {} {}{}", prefix.blue(), version.yellow(), marker);
        }
    }

    Ok(())
}
