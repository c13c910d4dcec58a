use colored::*;

use crate::context::Context;
use docr::docs::search as search_entries;
use docr::{Result, Symbol, log};

const MAX_RESULTS: usize = 20;

/// List every type and member whose name contains `query`
pub fn search(ctx: &Context, query: &str, library: &str, version: Option<&str>) -> Result<()> {
    let version = ctx.registry().resolve(library, version)?;
    let lib = ctx.store.load(library, &version)?;

    let results = search_entries(&lib.program, query);
    if results.is_empty() {
        log::info(format!("No results found for '{}'", query));
        return Ok(());
    }

    println!("\n{} Found {} result(s):\n", "🔍".cyan(), results.len());
    for entry in results.iter().take(MAX_RESULTS) {
        println!("  {} {}", "•".cyan(), entry.path().green());
        if log::is_verbose() {
            let summary = match entry.symbol {
                Symbol::Type(t) => t.summary.as_deref(),
                Symbol::Constant(c) => c.summary.as_deref(),
                Symbol::Constructor(m)
                | Symbol::ClassMethod(m)
                | Symbol::InstanceMethod(m)
                | Symbol::Macro(m) => m.summary.as_deref(),
            };
            if let Some(summary) = summary.filter(|s| !s.is_empty()) {
                println!("    {}", summary.dimmed());
            }
        }
    }
    if results.len() > MAX_RESULTS {
        println!("\n  ... and {} more", results.len() - MAX_RESULTS);
    }

    Ok(())
}
