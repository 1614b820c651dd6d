//! Write path: flatten a logical record into one atomic physical batch
//!
//! A record is planned entirely in memory first; every validation failure
//! (reserved separator in a key or field name, invalid inline separator,
//! separator collision with an encoded element) surfaces before any store
//! mutation. The resulting operations — prelude deletes of every previous
//! footprint variant, data writes, address tag, registries, and the TTL
//! fan-out — are submitted as a single atomic round trip.
//!
//! Placement rules for collections:
//! - top-level list/set, no separator: own physical key plus address tag
//! - top-level list/set, separator supplied: inline string under the
//!   native sentinel key (`|lsep|<key>` / `|ssep|<key>`), no tag
//! - direct child of a top-level map, no separator: sub-key
//!   (`<key>$<field>`) plus an entry in the `$list`/`$set` registry
//! - direct child with a separator, or any deeper nesting: inline string
//!   in a sentinel-prefixed hash field (deep iterables fall back to the
//!   default separator when none is supplied)

use crate::batch::{BatchExecutor, Operation};
use redmap_core::key::{self, InlineKind};
use redmap_core::{codec, validate_key, AddressTag, Result, Scalar, Value, META_SEPARATOR};
use redmap_store::adapters::{HashStore, ListStore, NativeStore, SetStore};
use redmap_store::{Backend, Command};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Flattened form of one top-level map, accumulated through the recursion
#[derive(Debug, Default)]
struct FlatRecord {
    /// Hash fields: flattened paths (sentinel-prefixed for inline
    /// iterables) paired with their scalar payloads
    fields: Vec<(String, Scalar)>,
    /// Direct-child list fields routed to their own sub-keys
    child_lists: Vec<(String, Vec<Scalar>)>,
    /// Direct-child set fields routed to their own sub-keys
    child_sets: Vec<(String, HashSet<Scalar>)>,
}

impl FlatRecord {
    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.child_lists.is_empty() && self.child_sets.is_empty()
    }
}

/// Plan the full operation list for one record
///
/// Returns an empty plan when the value is null, an empty collection, or a
/// map that flattens to nothing — absence means "unset", so nothing is
/// written and any previous record under the key survives.
pub fn plan_record(
    key: &str,
    value: &Value,
    ttl: Option<Duration>,
    separator: Option<&str>,
) -> Result<Vec<Operation>> {
    validate_key(key)?;
    if let Some(sep) = separator {
        codec::validate_separator(sep)?;
    }

    let mut operations = Vec::new();
    let mut written_keys: Vec<String> = Vec::new();

    match value {
        Value::Null => return Ok(Vec::new()),

        Value::Scalar(scalar) => {
            operations.push(prelude_delete(key));
            operations.push(Operation::new(NativeStore::write_many(vec![(
                key.to_string(),
                scalar.clone(),
            )])));
            written_keys.push(key.to_string());
        }

        Value::List(items) => {
            if items.is_empty() {
                return Ok(Vec::new());
            }
            operations.push(prelude_delete(key));
            match separator {
                Some(sep) => {
                    let sentinel = key::inline_sentinel(InlineKind::List, key);
                    let payload = codec::encode_inline(items, sep)?;
                    operations.push(Operation::new(NativeStore::write_many(vec![(
                        sentinel.clone(),
                        Scalar::Str(payload),
                    )])));
                    written_keys.push(sentinel);
                }
                None => {
                    for command in ListStore::replace(key, items) {
                        operations.push(Operation::new(command));
                    }
                    operations.push(address_tag(key, AddressTag::List));
                    written_keys.push(key.to_string());
                    written_keys.push(key::address_key(key));
                }
            }
        }

        Value::Set(members) => {
            if members.is_empty() {
                return Ok(Vec::new());
            }
            operations.push(prelude_delete(key));
            match separator {
                Some(sep) => {
                    let sentinel = key::inline_sentinel(InlineKind::Set, key);
                    let payload = codec::encode_inline(members, sep)?;
                    operations.push(Operation::new(NativeStore::write_many(vec![(
                        sentinel.clone(),
                        Scalar::Str(payload),
                    )])));
                    written_keys.push(sentinel);
                }
                None => {
                    for command in SetStore::replace(key, members) {
                        operations.push(Operation::new(command));
                    }
                    operations.push(address_tag(key, AddressTag::Set));
                    written_keys.push(key.to_string());
                    written_keys.push(key::address_key(key));
                }
            }
        }

        Value::Map(map) => {
            let mut flat = FlatRecord::default();
            flatten_fields("", map, separator, &mut flat)?;
            if flat.is_empty() {
                return Ok(Vec::new());
            }
            operations.push(prelude_delete(key));

            if !flat.fields.is_empty() {
                for command in HashStore::replace(key, std::mem::take(&mut flat.fields)) {
                    operations.push(Operation::new(command));
                }
                written_keys.push(key.to_string());
            }
            if !flat.child_lists.is_empty() {
                let names: Vec<&str> =
                    flat.child_lists.iter().map(|(f, _)| f.as_str()).collect();
                operations.push(registry_write(key::list_registry_key(key), &names));
                written_keys.push(key::list_registry_key(key));
                for (field, items) in &flat.child_lists {
                    let child = key::sub_key(key, field);
                    for command in ListStore::replace(&child, items) {
                        operations.push(Operation::new(command));
                    }
                    written_keys.push(child);
                }
            }
            if !flat.child_sets.is_empty() {
                let names: Vec<&str> =
                    flat.child_sets.iter().map(|(f, _)| f.as_str()).collect();
                operations.push(registry_write(key::set_registry_key(key), &names));
                written_keys.push(key::set_registry_key(key));
                for (field, members) in &flat.child_sets {
                    let child = key::sub_key(key, field);
                    for command in SetStore::replace(&child, members) {
                        operations.push(Operation::new(command));
                    }
                    written_keys.push(child);
                }
            }

            // A map that produced only sub-keys still needs the tag, or
            // the record would be unreachable on read.
            operations.push(address_tag(key, AddressTag::Hashmap));
            written_keys.push(key::address_key(key));
        }
    }

    if let Some(ttl) = ttl {
        for physical in written_keys {
            operations.push(Operation::new(Command::Expire { key: physical, ttl }));
        }
    }
    Ok(operations)
}

/// Plan and submit one record as a single atomic batch
///
/// Returns `false` when the skip policy applied and nothing was written.
pub fn store_record(
    backend: &dyn Backend,
    key: &str,
    value: &Value,
    ttl: Option<Duration>,
    separator: Option<&str>,
) -> Result<bool> {
    let operations = plan_record(key, value, ttl, separator)?;
    if operations.is_empty() {
        debug!(target: "redmap::write", key, "skipping null or empty record");
        return Ok(false);
    }
    debug!(
        target: "redmap::write",
        key,
        operations = operations.len(),
        "storing record"
    );
    let mut executor = BatchExecutor::new(backend);
    for operation in operations {
        executor.enqueue(operation);
    }
    executor.execute()?;
    Ok(true)
}

/// Delete every footprint variant a previous write to `key` may have left
///
/// Sub-keys of a superseded map are not covered here (that would cost a
/// read round trip); they become unreachable once the registries are gone
/// and are reaped by an explicit delete.
fn prelude_delete(key: &str) -> Operation {
    Operation::new(Command::Delete {
        keys: vec![
            key.to_string(),
            key::address_key(key),
            key::list_registry_key(key),
            key::set_registry_key(key),
            key::inline_sentinel(InlineKind::List, key),
            key::inline_sentinel(InlineKind::Set, key),
        ],
    })
}

fn address_tag(key: &str, tag: AddressTag) -> Operation {
    Operation::new(Command::Set {
        key: key::address_key(key),
        value: tag.as_str().to_string(),
    })
}

/// Registry payload: direct-child field names joined with `$`
fn registry_write(registry_key: String, fields: &[&str]) -> Operation {
    Operation::new(Command::Set {
        key: registry_key,
        value: fields.join(&META_SEPARATOR.to_string()),
    })
}

/// Recursive flattening of a map into hash fields and sub-key children
///
/// `path` is empty for direct children of the top-level map; deeper levels
/// carry the `|`-joined path. Null values and empty collections are
/// skipped wherever they appear.
fn flatten_fields(
    path: &str,
    map: &std::collections::HashMap<String, Value>,
    separator: Option<&str>,
    out: &mut FlatRecord,
) -> Result<()> {
    for (field, value) in map {
        validate_key(field)?;
        let field_path = key::join_path(path, field);
        match value {
            Value::Null => {}
            Value::Scalar(scalar) => out.fields.push((field_path, scalar.clone())),
            Value::List(items) => {
                if items.is_empty() {
                    continue;
                }
                if path.is_empty() && separator.is_none() {
                    out.child_lists.push((field.clone(), items.clone()));
                } else {
                    let sep = separator.unwrap_or(codec::DEFAULT_INLINE_SEPARATOR);
                    let payload = codec::encode_inline(items, sep)?;
                    out.fields.push((
                        key::inline_sentinel(InlineKind::List, &field_path),
                        Scalar::Str(payload),
                    ));
                }
            }
            Value::Set(members) => {
                if members.is_empty() {
                    continue;
                }
                if path.is_empty() && separator.is_none() {
                    out.child_sets.push((field.clone(), members.clone()));
                } else {
                    let sep = separator.unwrap_or(codec::DEFAULT_INLINE_SEPARATOR);
                    let payload = codec::encode_inline(members, sep)?;
                    out.fields.push((
                        key::inline_sentinel(InlineKind::Set, &field_path),
                        Scalar::Str(payload),
                    ));
                }
            }
            Value::Map(nested) => flatten_fields(&field_path, nested, separator, out)?,
        }
    }
    Ok(())
}
