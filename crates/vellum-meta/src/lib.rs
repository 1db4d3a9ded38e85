//! Lazily computed, case-insensitive metadata for vellum.
//!
//! Every document (and the engine's settings) carries a [`Metadata`] store:
//! an insertion-ordered property bag whose keys compare case-insensitively
//! and whose values may be deferred computations resolved on read.
//!
//! # Key Features
//!
//! - **Lazy values**: a slot can hold a closure evaluated against the store
//!   it is read from, so derived properties ("output path from input path")
//!   are never stale and never computed eagerly
//! - **Typed retrieval**: callers ask for the type they want; a per-store
//!   [`ConversionTable`] bridges the stored runtime type to the requested
//!   one, falling back to a direct downcast
//! - **Case-insensitive keys**: `"Title"`, `"title"` and `"TITLE"` address
//!   the same slot, and the first-written casing is what enumeration yields
//! - **Views**: [`Metadata::get_metadata`] scopes a store to a key subset
//!   while sharing the underlying slots
//!
//! # Example
//!
//! ```
//! use vellum_meta::{Metadata, Value};
//!
//! let mut meta = Metadata::new();
//! meta.insert("Title", "Getting Started");
//! meta.insert(
//!     "slug",
//!     Value::computed(|m| {
//!         let title: String = m.get("title").unwrap_or_default();
//!         Value::from(title.to_lowercase().replace(' ', "-"))
//!     }),
//! );
//!
//! let slug: Option<String> = meta.try_get("Slug").unwrap();
//! assert_eq!(slug.as_deref(), Some("getting-started"));
//! ```

mod convert;
mod error;
mod key;
mod metadata;
mod value;

pub use convert::ConversionTable;
pub use error::MetadataError;
pub use key::{Key, KeyQuery};
pub use metadata::Metadata;
pub use value::{ComputedFn, Value};
