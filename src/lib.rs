//! docr - Crystal documentation browser
//!
//! Imports versioned API documentation into a local library and resolves
//! symbols against it.

pub mod config;
pub mod docs;
pub mod error;
pub mod log;
pub mod registry;
pub mod source;
pub mod store;
pub mod toolchain;

// Re-export commonly used types
pub use config::Config;
pub use docs::{Library, Symbol, Type, find_symbol};
pub use error::{DocrError, Result};
pub use registry::{Origin, Registry, Resolution};
pub use source::{HttpSource, ImportableVersion, VersionSource};
pub use store::{LibraryStore, LibraryVersionSet};
