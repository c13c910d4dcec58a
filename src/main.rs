use clap::{Parser, Subcommand};
use colored::*;

mod about;
mod add;
mod context;
mod env;
mod info;
mod list;
mod remove;
mod render;
mod search;
mod syntax;
mod update;

use context::Context;
use docr::config::{Config, STDLIB};
use docr::log;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "docr", version)]
#[command(about = "A local documentation browser for Crystal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the README of an imported library
    About {
        name: String,
        /// Version to show (latest imported if not specified)
        version: Option<String>,
    },
    /// Show documentation for a type, constant, method or macro
    Info {
        /// Name or fully qualified name to look up
        symbol: String,
        /// Library to search
        #[arg(default_value = STDLIB)]
        library: String,
        /// Version to search (latest imported if not specified)
        version: Option<String>,
    },
    /// Search names containing a query
    Search {
        query: String,
        /// Library to search
        #[arg(default_value = STDLIB)]
        library: String,
        /// Version to search (latest imported if not specified)
        version: Option<String>,
    },
    /// List imported libraries and versions
    List,
    /// Import documentation for a library from its configured source
    Add {
        name: String,
        /// Version to import (newest available if not specified)
        version: Option<String>,
    },
    /// Remove an imported library or one of its versions
    Remove {
        name: String,
        version: Option<String>,
    },
    /// Import the standard library docs matching the installed compiler
    ///
    /// Uses the version reported by `crystal version`. If the compiler is not
    /// found or its version is unavailable, the newest available version is
    /// imported instead. Nothing is fetched if the docs are already imported.
    Update,
    /// Print environment values (DOCR_CACHE, DOCR_LIBRARY)
    #[command(args_conflicts_with_subcommands = true)]
    Env {
        /// Print only this value
        name: Option<String>,
        #[command(subcommand)]
        action: Option<EnvCommands>,
    },
}

#[derive(Subcommand)]
enum EnvCommands {
    /// Create the cache and library directories and a config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    log::set_verbose(cli.verbose);

    let ctx = Context::new(Config::load());

    let result = match cli.command {
        Commands::About { name, version } => about::about(&ctx, &name, version.as_deref()),
        Commands::Info {
            symbol,
            library,
            version,
        } => match info::info(&ctx, &symbol, &library, version.as_deref()) {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::Search {
            query,
            library,
            version,
        } => search::search(&ctx, &query, &library, version.as_deref()),
        Commands::List => list::list(&ctx),
        Commands::Add { name, version } => add::add(&ctx, &name, version.as_deref()),
        Commands::Remove { name, version } => remove::remove(&ctx, &name, version.as_deref()),
        Commands::Update => update::update(&ctx),
        Commands::Env { name, action } => match action {
            Some(EnvCommands::Init { force }) => env::init_env(&ctx, force),
            None => env::show_env(&ctx, name.as_deref()),
        },
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.to_string().red());
        if let Some(hint) = e.hint() {
            eprintln!("   {}", hint.yellow());
        }
        std::process::exit(1);
    }
}
