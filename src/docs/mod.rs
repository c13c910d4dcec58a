//! Crystal API documentation model and symbol lookup
//!
//! A library version's documentation is a single manifest (`index.json`)
//! whose `program` field is the root [`Type`]. Every nested type, constant,
//! constructor, method and macro hangs off that root.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docr::docs::{find_symbol, Library, Symbol};
//!
//! let lib: Library = serde_json::from_str(&json)?;
//! if let Some(Symbol::InstanceMethod(m)) = find_symbol(&lib.program, "push") {
//!     println!("{}", m.signature("def "));
//! }
//! ```

mod find;
mod suggest;
mod types;

pub use find::{Symbol, find_symbol};
pub use suggest::{Entry, entries, search, suggestions};
pub use types::{Arg, Constant, Def, Library, Location, Method, Named, Type, TypeRef};
