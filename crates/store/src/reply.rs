//! Reply values returned by the store
//!
//! Each `Command` produces exactly one `Reply`; batch execution returns
//! replies in submission order. The `into_*` accessors check the shape and
//! surface a usage error when a reply is read as the wrong kind, which can
//! only happen when result demultiplexing mismatched labels to commands.

use redmap_core::{Error, Result};
use std::collections::HashMap;

/// A single command result
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Acknowledged write with no payload (SET/MSET/RPUSH/SADD/HSET/DEL-style acks)
    Unit,
    /// Integer result (`DEL`, `EXISTS` counts)
    Int(i64),
    /// Boolean result (`EXPIRE`)
    Bool(bool),
    /// Optional string (`GET`)
    Value(Option<String>),
    /// Optional strings in request order (`MGET`)
    Values(Vec<Option<String>>),
    /// Collection items (`LRANGE`, `SMEMBERS`)
    Items(Vec<String>),
    /// Hash field map (`HGETALL`); empty when the key is absent
    Fields(HashMap<String, String>),
}

impl Reply {
    fn shape(&self) -> &'static str {
        match self {
            Reply::Unit => "unit",
            Reply::Int(_) => "int",
            Reply::Bool(_) => "bool",
            Reply::Value(_) => "value",
            Reply::Values(_) => "values",
            Reply::Items(_) => "items",
            Reply::Fields(_) => "fields",
        }
    }

    fn wrong_shape(&self, wanted: &str) -> Error {
        Error::Usage(format!(
            "reply shape mismatch: wanted {wanted}, got {}",
            self.shape()
        ))
    }

    /// Integer count, or a usage error
    pub fn into_int(self) -> Result<i64> {
        match self {
            Reply::Int(n) => Ok(n),
            other => Err(other.wrong_shape("int")),
        }
    }

    /// Boolean, or a usage error
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Reply::Bool(b) => Ok(b),
            other => Err(other.wrong_shape("bool")),
        }
    }

    /// Single optional value, or a usage error
    pub fn into_value(self) -> Result<Option<String>> {
        match self {
            Reply::Value(v) => Ok(v),
            other => Err(other.wrong_shape("value")),
        }
    }

    /// Ordered optional values, or a usage error
    pub fn into_values(self) -> Result<Vec<Option<String>>> {
        match self {
            Reply::Values(v) => Ok(v),
            other => Err(other.wrong_shape("values")),
        }
    }

    /// Collection items, or a usage error
    pub fn into_items(self) -> Result<Vec<String>> {
        match self {
            Reply::Items(v) => Ok(v),
            other => Err(other.wrong_shape("items")),
        }
    }

    /// Hash field map, or a usage error
    pub fn into_fields(self) -> Result<HashMap<String, String>> {
        match self {
            Reply::Fields(f) => Ok(f),
            other => Err(other.wrong_shape("fields")),
        }
    }
}
