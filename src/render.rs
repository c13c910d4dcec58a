//! Terminal display of documented entities

use colored::*;
use docr::docs::{Constant, Location, Method, Symbol, Type};

use crate::syntax::highlight_crystal_code;

const DOC_PREVIEW_LINES: usize = 8;

pub fn display_symbol(symbol: Symbol<'_>, verbose: bool) {
    match symbol {
        Symbol::Type(t) => display_type(t, verbose),
        Symbol::Constant(c) => display_constant(c, verbose),
        Symbol::Constructor(m) | Symbol::ClassMethod(m) => {
            display_method(m, "def self.", symbol.kind(), verbose)
        }
        Symbol::InstanceMethod(m) => display_method(m, "def ", symbol.kind(), verbose),
        Symbol::Macro(m) => display_method(m, "macro ", symbol.kind(), verbose),
    }
}

fn display_type(t: &Type, verbose: bool) {
    println!();
    println!("{}", "╔═══════════════════════════════════════════╗".cyan());
    println!("║ {} {} {}", "📦".cyan(), t.kind.yellow(), t.full_name.green().bold());
    println!("{}", "╚═══════════════════════════════════════════╝".cyan());
    println!();

    if let Some(superclass) = &t.superclass {
        println!("{} {}", "Inherits:".bold(), superclass.full_name.cyan());
    }
    if let Some(aliased) = t.aliased.as_deref().filter(|a| !a.is_empty()) {
        println!("{} {}", "Alias of:".bold(), aliased.cyan());
    }
    if !t.included_modules.is_empty() {
        let names: Vec<&str> = t.included_modules.iter().map(|m| m.full_name.as_str()).collect();
        println!("{} {}", "Includes:".bold(), names.join(", ").cyan());
    }
    if let Some(location) = t.locations.first() {
        display_location(location);
    }

    display_doc(t.doc.as_deref(), verbose, "");

    let sections: [(&str, Vec<&str>); 6] = [
        ("Types", t.types.iter().map(|x| x.name.as_str()).collect()),
        ("Constants", t.constants.iter().map(|x| x.name.as_str()).collect()),
        ("Constructors", t.constructors.iter().map(|x| x.name.as_str()).collect()),
        ("Class methods", t.class_methods.iter().map(|x| x.name.as_str()).collect()),
        ("Instance methods", t.instance_methods.iter().map(|x| x.name.as_str()).collect()),
        ("Macros", t.macros.iter().map(|x| x.name.as_str()).collect()),
    ];

    for (title, names) in sections {
        if names.is_empty() {
            continue;
        }
        println!();
        println!("{} {}", format!("{}:", title).bold(), names.len().to_string().dimmed());
        for name in names {
            println!("  {} {}", "•".cyan(), name.green());
        }
    }
    println!();
}

fn display_constant(c: &Constant, verbose: bool) {
    println!();
    println!(
        "  {} {}",
        "▸".cyan(),
        highlight_crystal_code(&format!("{} = {}", c.name, c.value))
    );
    display_doc(c.doc.as_deref(), verbose, "    ");
    println!();
}

fn display_method(m: &Method, keyword: &str, kind: &str, verbose: bool) {
    let abstract_marker = if m.is_abstract {
        format!(" {}", "[ABSTRACT]".red())
    } else {
        String::new()
    };

    println!();
    println!(
        "  {} {}{}",
        "▸".cyan(),
        m.name.yellow().bold(),
        format!(" ({})", kind).dimmed()
    );
    println!(
        "    {}{}",
        highlight_crystal_code(&m.signature(keyword)),
        abstract_marker
    );
    if let Some(location) = &m.location {
        print!("  ");
        display_location(location);
    }
    display_doc(m.doc.as_deref(), verbose, "    ");
    println!();
}

fn display_location(location: &Location) {
    println!(
        "{} {}:{}",
        "📄".cyan(),
        location.filename.cyan(),
        location.line_number.to_string().yellow()
    );
}

fn display_doc(doc: Option<&str>, verbose: bool, indent: &str) {
    let Some(doc) = doc.filter(|d| !d.trim().is_empty()) else {
        return;
    };

    println!();
    let lines: Vec<&str> = doc.lines().collect();
    let shown = if verbose {
        lines.len()
    } else {
        lines.len().min(DOC_PREVIEW_LINES)
    };

    for line in &lines[..shown] {
        println!("{}{}", indent, line.dimmed());
    }
    if shown < lines.len() {
        println!("{}{}", indent, "... (use --verbose for the full text)".dimmed());
    }
}
