//! Core types for redmap
//!
//! This crate defines the foundational pieces used throughout the system:
//! - Scalar: the closed set of storable scalar types
//! - Value: a logical record value (scalar, list, set, or nested map)
//! - codec: reversible scalar encode/decode with embedded type tags
//! - key: reserved-separator validation and physical-key construction
//! - AddressTag: per-logical-key encoding metadata
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod key;
pub mod scalar;

// Re-export commonly used types
pub use codec::{decode, decode_inline, encode, encode_inline, DecodeError, DEFAULT_INLINE_SEPARATOR};
pub use error::{Error, Result};
pub use key::{validate_key, AddressTag, InlineKind, KeyError, META_SEPARATOR, PATH_SEPARATOR};
pub use scalar::{Scalar, Value};
