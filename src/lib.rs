//! redmap - type-preserving record mapping over a Redis-like store
//!
//! Stores structured application values (scalars, lists, sets, and nested
//! maps) inside a schemaless string-oriented key-value store, and
//! reconstructs them losslessly on read. Every scalar carries an embedded
//! type tag; every non-scalar record carries address metadata describing
//! its physical layout.
//!
//! ## Quick start
//!
//! ```
//! use redmap::{Cache, Scalar, Value};
//! use std::collections::HashMap;
//!
//! let cache = Cache::in_memory();
//!
//! let mut user = HashMap::new();
//! user.insert("name".to_string(), Value::from("Ada"));
//! user.insert("scores".to_string(), Value::List(vec![Scalar::Int(9)]));
//! cache.set("user:1", Value::Map(user.clone()))?;
//!
//! assert_eq!(cache.get("user:1")?, Some(Value::Map(user)));
//! # redmap::Result::Ok(())
//! ```
//!
//! ## Crate layout
//!
//! - [`redmap_core`]: scalar/value types, codec, key grammar, errors
//! - [`redmap_store`]: raw commands, replies, backends, store adapters
//! - [`redmap_engine`]: flattening write path, two-phase read path, batches
//! - [`redmap_api`]: the [`Cache`] facade

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use redmap_api::{Cache, SetOptions};
pub use redmap_core::{Error, Result, Scalar, Value};
pub use redmap_store::{Backend, MemoryBackend};
