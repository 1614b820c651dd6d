//! First-class command values for the raw store primitive set
//!
//! Every deferred operation is an explicit `Command` value queued into a
//! batch, never a method name resolved at runtime. The set mirrors the
//! Redis commands the mapping layer relies on: `SET`, `GET`, `MSET`,
//! `MGET`, `DEL`, `EXISTS`, `EXPIRE`, `FLUSHDB`, `RPUSH`, `LRANGE 0 -1`,
//! `SADD`, `SMEMBERS`, `HSET` (field map), `HGETALL`.
//!
//! All payloads are already-encoded strings: the codec runs in the adapter
//! layer, the command layer is untyped plumbing.

use std::time::Duration;

/// A raw store command
///
/// Commands are self-contained and cheap to queue; the backend executes
/// them either immediately or as one atomic pipelined batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set one string key
    Set {
        /// Physical key
        key: String,
        /// Encoded payload
        value: String,
    },
    /// Set many string keys in one command (`MSET`)
    SetMany {
        /// Key/payload pairs
        pairs: Vec<(String, String)>,
    },
    /// Get one string key (`GET`)
    Get {
        /// Physical key
        key: String,
    },
    /// Get many string keys in one command (`MGET`)
    GetMany {
        /// Physical keys, reply order matches
        keys: Vec<String>,
    },
    /// Delete keys of any type (`DEL`)
    Delete {
        /// Physical keys
        keys: Vec<String>,
    },
    /// Count how many of the keys exist (`EXISTS`)
    Exists {
        /// Physical keys
        keys: Vec<String>,
    },
    /// Set a time-to-live on one key (`EXPIRE`)
    Expire {
        /// Physical key
        key: String,
        /// Time to live
        ttl: Duration,
    },
    /// Append items to a list key (`RPUSH`)
    PushList {
        /// Physical key
        key: String,
        /// Encoded items in order
        items: Vec<String>,
    },
    /// Read a whole list key (`LRANGE 0 -1`)
    RangeList {
        /// Physical key
        key: String,
    },
    /// Add members to a set key (`SADD`)
    AddSet {
        /// Physical key
        key: String,
        /// Encoded members
        members: Vec<String>,
    },
    /// Read a whole set key (`SMEMBERS`)
    Members {
        /// Physical key
        key: String,
    },
    /// Write a field map into a hash key (`HSET`)
    PutHash {
        /// Physical key
        key: String,
        /// Encoded field/value pairs
        fields: Vec<(String, String)>,
    },
    /// Read a whole hash key (`HGETALL`)
    GetHash {
        /// Physical key
        key: String,
    },
    /// Drop every key in the store (`FLUSHDB`)
    FlushAll,
}

impl Command {
    /// Short command name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::SetMany { .. } => "MSET",
            Command::Get { .. } => "GET",
            Command::GetMany { .. } => "MGET",
            Command::Delete { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Expire { .. } => "EXPIRE",
            Command::PushList { .. } => "RPUSH",
            Command::RangeList { .. } => "LRANGE",
            Command::AddSet { .. } => "SADD",
            Command::Members { .. } => "SMEMBERS",
            Command::PutHash { .. } => "HSET",
            Command::GetHash { .. } => "HGETALL",
            Command::FlushAll => "FLUSHDB",
        }
    }
}
