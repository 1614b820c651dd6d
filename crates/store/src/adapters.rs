//! Thin per-collection-type store adapters
//!
//! One adapter per physical encoding. Write-side methods build the raw
//! commands for the batch (collections use replace semantics: delete, then
//! rebuild, inside the same atomic batch); read-side methods decode replies
//! back into scalars. Adapters are stateless: all state lives in the store.

use crate::command::Command;
use crate::reply::Reply;
use redmap_core::{codec, Error, Result, Scalar};
use std::collections::{HashMap, HashSet};

/// Native adapter: encoded scalars under plain string keys
pub struct NativeStore;

impl NativeStore {
    /// One `MSET` for a batch of scalar writes
    pub fn write_many(pairs: Vec<(String, Scalar)>) -> Command {
        Command::SetMany {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key, codec::encode(&value)))
                .collect(),
        }
    }

    /// One `MGET` over the given keys
    pub fn fetch_many(keys: Vec<String>) -> Command {
        Command::GetMany { keys }
    }

    /// Pair an `MGET` reply back with its keys, decoding each present value
    ///
    /// Absent keys are omitted from the result, never mapped to a
    /// placeholder.
    pub fn decode_many(keys: &[String], reply: Reply) -> Result<HashMap<String, Scalar>> {
        let values = reply.into_values()?;
        if values.len() != keys.len() {
            return Err(Error::Usage(format!(
                "MGET reply has {} values for {} keys",
                values.len(),
                keys.len()
            )));
        }
        let mut decoded = HashMap::new();
        for (key, value) in keys.iter().zip(values) {
            if let Some(encoded) = value {
                decoded.insert(key.clone(), codec::decode(&encoded)?);
            }
        }
        Ok(decoded)
    }
}

/// List adapter: ordered scalars under one list key
pub struct ListStore;

impl ListStore {
    /// Replace the list: `DEL` then `RPUSH` in the same batch
    pub fn replace(key: &str, items: &[Scalar]) -> Vec<Command> {
        vec![
            Command::Delete {
                keys: vec![key.to_string()],
            },
            Command::PushList {
                key: key.to_string(),
                items: items.iter().map(codec::encode).collect(),
            },
        ]
    }

    /// Whole-list read
    pub fn fetch(key: &str) -> Command {
        Command::RangeList {
            key: key.to_string(),
        }
    }

    /// Decode an `LRANGE` reply, order preserved
    pub fn decode(reply: Reply) -> Result<Vec<Scalar>> {
        reply
            .into_items()?
            .iter()
            .map(|item| codec::decode(item).map_err(Error::from))
            .collect()
    }
}

/// Set adapter: unordered scalars under one set key
pub struct SetStore;

impl SetStore {
    /// Replace the set: `DEL` then `SADD` in the same batch
    pub fn replace(key: &str, members: &HashSet<Scalar>) -> Vec<Command> {
        vec![
            Command::Delete {
                keys: vec![key.to_string()],
            },
            Command::AddSet {
                key: key.to_string(),
                members: members.iter().map(codec::encode).collect(),
            },
        ]
    }

    /// Whole-set read
    pub fn fetch(key: &str) -> Command {
        Command::Members {
            key: key.to_string(),
        }
    }

    /// Decode an `SMEMBERS` reply
    pub fn decode(reply: Reply) -> Result<HashSet<Scalar>> {
        reply
            .into_items()?
            .iter()
            .map(|member| codec::decode(member).map_err(Error::from))
            .collect()
    }
}

/// Hash adapter: encoded field map under one hash key
pub struct HashStore;

impl HashStore {
    /// Replace the hash: `DEL` then `HSET` in the same batch
    ///
    /// Field keys are flattened paths and stay verbatim; field values are
    /// scalar-encoded (inline-iterable payloads arrive here already wrapped
    /// as `Scalar::Str`).
    pub fn replace(key: &str, fields: Vec<(String, Scalar)>) -> Vec<Command> {
        vec![
            Command::Delete {
                keys: vec![key.to_string()],
            },
            Command::PutHash {
                key: key.to_string(),
                fields: fields
                    .into_iter()
                    .map(|(field, value)| (field, codec::encode(&value)))
                    .collect(),
            },
        ]
    }

    /// Whole-hash read
    pub fn fetch(key: &str) -> Command {
        Command::GetHash {
            key: key.to_string(),
        }
    }

    /// Decode an `HGETALL` reply: field keys verbatim, values decoded
    pub fn decode(reply: Reply) -> Result<HashMap<String, Scalar>> {
        reply
            .into_fields()?
            .into_iter()
            .map(|(field, value)| Ok((field, codec::decode(&value)?)))
            .collect()
    }
}
