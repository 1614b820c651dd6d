//! Error types for redmap
//!
//! This module defines the unified error taxonomy used throughout the
//! system. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! All errors are synchronous and propagate to the immediate caller; there
//! is no automatic retry or partial-application recovery. A failed batch
//! leaves the store unchanged (pipeline atomicity), and the caller decides
//! whether to retry.

use crate::codec::DecodeError;
use crate::key::KeyError;
use thiserror::Error;

/// Result type alias for redmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the mapping layer
#[derive(Debug, Error)]
pub enum Error {
    /// A logical or nested field key contains a reserved separator
    #[error("invalid key: {0}")]
    Key(#[from] KeyError),

    /// Wrong argument shape: invalid inline separator, a collection element
    /// colliding with its own inline separator, and similar input defects
    #[error("invalid value: {0}")]
    Value(String),

    /// A stored encoded value does not match any known type prefix, or
    /// fails type-specific parsing
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Batch result-to-label reconciliation failed, or a reply had the
    /// wrong shape for the command that produced it
    #[error("usage error: {0}")]
    Usage(String),

    /// The backing store rejected a command (e.g. a list command against a
    /// string key) or failed the round trip
    #[error("store error: {0}")]
    Store(String),
}
