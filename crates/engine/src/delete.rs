//! Full-footprint delete
//!
//! Deleting a logical key removes every physical key a write may have
//! created for it: the key itself, the address tag, both child registries,
//! both inline sentinel variants, and every sub-key the registries still
//! name. The registries are read first (same metadata round trip as a
//! read), then one `DEL` per logical key runs in a single atomic batch.

use crate::batch::{BatchExecutor, Operation};
use crate::read::{resolve_plan, KeyPlan};
use redmap_core::key::{self, InlineKind};
use redmap_core::{Error, Result};
use redmap_store::{Backend, Command};
use tracing::debug;

/// Delete the full physical footprint of each logical key
///
/// Returns `true` only when every requested key had something to remove;
/// an empty request is vacuously `true`.
pub fn delete_records(backend: &dyn Backend, keys: &[String]) -> Result<bool> {
    let plan = resolve_plan(backend, keys)?;
    if plan.is_empty() {
        return Ok(true);
    }

    let mut executor = BatchExecutor::new(backend);
    for (key, key_plan) in &plan.entries {
        let mut physical = vec![
            key.clone(),
            key::address_key(key),
            key::list_registry_key(key),
            key::set_registry_key(key),
            key::inline_sentinel(InlineKind::List, key),
            key::inline_sentinel(InlineKind::Set, key),
        ];
        if let KeyPlan::Map {
            list_fields,
            set_fields,
        } = key_plan
        {
            for field in list_fields.iter().chain(set_fields) {
                physical.push(key::sub_key(key, field));
            }
        }
        executor.enqueue(Operation::labeled(
            Command::Delete { keys: physical },
            key.clone(),
        ));
    }
    let mut results = executor.execute()?;

    let mut all_removed = true;
    for (key, _) in &plan.entries {
        let removed = results
            .take(key)
            .ok_or_else(|| Error::Usage(format!("missing delete reply for key {key:?}")))?
            .into_int()?;
        all_removed &= removed > 0;
    }
    debug!(
        target: "redmap::delete",
        keys = plan.entries.len(),
        all_removed,
        "deleted records"
    );
    Ok(all_removed)
}
