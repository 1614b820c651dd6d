//! Store layer for redmap
//!
//! This crate models the remote Redis-like store:
//! - Command: first-class values for the raw primitive command set
//! - Reply: ordered results with checked shape accessors
//! - Backend: the capability trait (immediate run + atomic batched run)
//! - MemoryBackend: mutex-guarded in-memory implementation
//! - adapters: thin per-collection-type encode/decode adapters

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod command;
pub mod memory;
pub mod reply;
pub mod traits;

pub use command::Command;
pub use memory::MemoryBackend;
pub use reply::Reply;
pub use traits::Backend;
