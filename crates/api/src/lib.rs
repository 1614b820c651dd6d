//! Public facade for redmap
//!
//! Exposes the [`Cache`] facade and its [`SetOptions`]; everything else
//! (codec, flattener, batch executor, backends) lives in the lower crates
//! and is orchestrated from here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod options;

pub use cache::Cache;
pub use options::SetOptions;
