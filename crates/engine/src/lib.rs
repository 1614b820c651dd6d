//! Mapping engine for redmap
//!
//! Orchestrates the core pieces into the two data paths:
//!
//! - write: flatten a logical record into flat physical fields with address
//!   tags, then submit everything as one atomic pipelined batch
//! - read: resolve address tags and child registries (round trip 1), then
//!   fetch and decode the typed payloads this revealed (round trip 2)
//!
//! The two read round trips are deliberately not atomic with respect to
//! concurrent writers; see [`read`] for the documented race.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod delete;
pub mod read;
pub mod write;

pub use batch::{BatchExecutor, BatchResults, Operation};
pub use delete::delete_records;
pub use read::{fetch_plan, load_records, resolve_plan, ReadPlan};
pub use write::{plan_record, store_record};
