use colored::*;
use terminal_size::{Width, terminal_size};

use crate::context::Context;
use crate::syntax::highlight_markdown;
use docr::{Result, log};

/// Get the current terminal width, defaulting to 80 if unable to detect
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    }
}

/// Print the README of a library, using the latest imported version unless one is given
pub fn about(ctx: &Context, name: &str, version: Option<&str>) -> Result<()> {
    let version = ctx.registry().resolve(name, version)?;

    let Some(readme) = ctx.store.readme(name, &version)? else {
        log::error(format!("library {} version {} has no README", name, version));
        return Ok(());
    };

    let width = get_terminal_width().saturating_sub(2).clamp(40, 120);
    println!("{} {} {}", "📖".cyan(), name.green().bold(), version.yellow());
    println!("{}", "─".repeat(width).dimmed());
    println!("{}", highlight_markdown(&readme));

    Ok(())
}
