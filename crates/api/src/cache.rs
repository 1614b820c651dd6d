//! Cache facade - Redis-familiar operations over typed records
//!
//! The facade is the single public entry point of the mapping layer. It
//! takes logical keys and [`Value`]s and hides the physical footprint
//! (address tags, registries, sub-keys, inline sentinels) behind plain
//! `set`/`get`/`delete` calls.
//!
//! | Facade | Engine |
//! |--------|--------|
//! | `set(key, value)` | plan + one atomic batch |
//! | `set_many(map)` | all records in one atomic batch |
//! | `get(key)` | metadata round trip, then typed fetches |
//! | `get_many(keys)` | same, batched across keys |
//! | `delete(keys)` | registry read, then one footprint `DEL` per key |
//! | `exists(keys)` | `EXISTS` on the named keys, verbatim |
//! | `expire(ttl, keys)` | `EXPIRE` on the named keys, verbatim |
//! | `flush()` | `FLUSHDB` |

use crate::options::SetOptions;
use redmap_core::{Result, Value};
use redmap_engine::{delete_records, load_records, plan_record, store_record, BatchExecutor};
use redmap_store::{Backend, Command, Reply};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Type-preserving cache over a Redis-like backend
///
/// ## Example
///
/// ```
/// use redmap_api::Cache;
/// use redmap_core::{Scalar, Value};
///
/// let cache = Cache::in_memory();
/// cache.set("scores", Value::List(vec![Scalar::Int(9), Scalar::Int(8)]))?;
/// assert_eq!(
///     cache.get("scores")?,
///     Some(Value::List(vec![Scalar::Int(9), Scalar::Int(8)]))
/// );
/// # redmap_core::Result::Ok(())
/// ```
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn Backend>,
}

impl Cache {
    /// Cache over an existing backend
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Cache over a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(redmap_store::MemoryBackend::new()))
    }

    /// Store one record
    ///
    /// `Null` and empty collections are a no-op: absence means "unset".
    /// Replaces any previous record under the key, whatever its shape.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.set_with_options(key, value, &SetOptions::new())
    }

    /// Store one record with a TTL and/or inline separator
    pub fn set_with_options(
        &self,
        key: &str,
        value: impl Into<Value>,
        options: &SetOptions,
    ) -> Result<()> {
        let value = value.into();
        debug!(target: "redmap::cache", key, "set");
        store_record(
            self.backend.as_ref(),
            key,
            &value,
            options.ttl,
            options.separator.as_deref(),
        )?;
        Ok(())
    }

    /// Store several records in one atomic batch
    ///
    /// Either every record lands or none does; all validation runs before
    /// the store is touched.
    pub fn set_many(&self, records: HashMap<String, Value>) -> Result<()> {
        self.set_many_with_options(records, &SetOptions::new())
    }

    /// Store several records in one atomic batch, sharing the options
    pub fn set_many_with_options(
        &self,
        records: HashMap<String, Value>,
        options: &SetOptions,
    ) -> Result<()> {
        debug!(target: "redmap::cache", records = records.len(), "set_many");
        let mut executor = BatchExecutor::new(self.backend.as_ref());
        for (key, value) in &records {
            for operation in plan_record(key, value, options.ttl, options.separator.as_deref())? {
                executor.enqueue(operation);
            }
        }
        executor.execute()?;
        Ok(())
    }

    /// Load one record
    ///
    /// `None` means the key is absent; absence is never an error.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        debug!(target: "redmap::cache", key, "get");
        let mut records = load_records(self.backend.as_ref(), &[key.to_string()])?;
        Ok(records.remove(key))
    }

    /// Load several records; absent keys are omitted from the result
    pub fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Value>> {
        debug!(target: "redmap::cache", keys = keys.len(), "get_many");
        load_records(self.backend.as_ref(), keys)
    }

    /// Delete the full physical footprint of each key
    ///
    /// Returns `true` only when every requested key had something to
    /// remove.
    pub fn delete(&self, keys: &[String]) -> Result<bool> {
        debug!(target: "redmap::cache", keys = keys.len(), "delete");
        delete_records(self.backend.as_ref(), keys)
    }

    /// Check key presence; `true` only when ALL named keys exist
    ///
    /// Keys are passed to the store verbatim: a record written inline
    /// (under a sentinel key) does not count as its logical key here.
    pub fn exists(&self, keys: &[String]) -> Result<bool> {
        if keys.is_empty() {
            return Ok(true);
        }
        let reply = self.backend.run(Command::Exists {
            keys: keys.to_vec(),
        })?;
        Ok(reply.into_int()? == keys.len() as i64)
    }

    /// Set a TTL on the named keys, verbatim
    ///
    /// Returns `true` only when every expiration was applied (a missing
    /// key cannot be expired).
    pub fn expire(&self, ttl: std::time::Duration, keys: &[String]) -> Result<bool> {
        debug!(target: "redmap::cache", keys = keys.len(), ?ttl, "expire");
        let commands = keys
            .iter()
            .map(|key| Command::Expire {
                key: key.clone(),
                ttl,
            })
            .collect();
        let replies = self.backend.run_atomic(commands)?;
        let mut all = true;
        for reply in replies {
            all &= reply.into_bool()?;
        }
        Ok(all)
    }

    /// Drop every key in the store
    pub fn flush(&self) -> Result<bool> {
        debug!(target: "redmap::cache", "flush");
        let reply = self.backend.run(Command::FlushAll)?;
        Ok(matches!(reply, Reply::Unit))
    }
}
