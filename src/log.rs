//! Colored terminal logging shared by the library and the command layer

use colored::*;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable debug output for the rest of the process
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

/// Read by the command layer to show full docs and summaries
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn info(msg: impl Display) {
    println!("{} {}", "ℹ️".blue(), msg);
}

pub fn success(msg: impl Display) {
    println!("{} {}", "✅".green(), msg);
}

pub fn warn(msg: impl Display) {
    eprintln!("{} {}", "⚠️".yellow(), msg.to_string().yellow());
}

pub fn error(msg: impl Display) {
    eprintln!("{} {}", "❌".red(), msg.to_string().red());
}

pub fn debug(msg: impl Display) {
    if is_verbose() {
        eprintln!("{} {}", "›".dimmed(), msg.to_string().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
