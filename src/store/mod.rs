// src/store/mod.rs
//! JSON-backed key-path storage.
//!
//! A [`KeyedJsonDocument`] owns one value at a fixed [`KeyPath`] inside a JSON
//! file. Several documents may point into the same file at different paths;
//! each `save` re-reads the file and patches only its own path, so writes to
//! other paths survive unless two saves interleave (there is no lock).
//!
//! Failure handling, in short:
//! - missing file or missing key: the default value, not an error
//! - unreadable or malformed file on load: default value, and `save` is
//!   refused from then on
//! - malformed file on save: rewritten from an empty object
//! - a non-object in the way of the key path: typed [`PatchError`], no write
mod document;
mod key_path;
pub mod patch;

pub use document::{DocumentError, KeyedJsonDocument, as_integer, to_pretty_string};
pub use key_path::KeyPath;
pub use patch::PatchError;
