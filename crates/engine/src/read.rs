//! Read path: resolve address metadata, then fetch and rebuild records
//!
//! A composite read is two sequential atomic round trips:
//!
//! 1. `resolve_plan` — one `MGET` per requested key over its address tag
//!    and child registries, producing a [`ReadPlan`].
//! 2. `fetch_plan` — the typed fetches the plan calls for (hash, list,
//!    set, sub-keys, or native candidate probes), decoded and unflattened
//!    back into [`Value`]s.
//!
//! The window between the two trips is not atomic with respect to
//! concurrent writers. A record superseded in that window is read either
//! as absent, as its new value, or as a store error when a typed fetch
//! hits a retyped key; unrelated keys are never affected.

use crate::batch::{BatchExecutor, Operation};
use redmap_core::key::{self, InlineKind};
use redmap_core::{
    codec, validate_key, AddressTag, Error, Result, Scalar, Value, META_SEPARATOR, PATH_SEPARATOR,
};
use redmap_store::adapters::{HashStore, ListStore, NativeStore, SetStore};
use redmap_store::{Backend, Command};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Fetch strategy resolved for one logical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyPlan {
    /// No address tag: probe the plain key and both inline sentinels
    Native,
    /// Tagged list under its own physical key
    List,
    /// Tagged set under its own physical key
    Set,
    /// Tagged map: hash plus the registry-named child sub-keys
    Map {
        list_fields: Vec<String>,
        set_fields: Vec<String>,
    },
}

/// Resolved fetch strategies for a batch of logical keys (round trip 1)
#[derive(Debug)]
pub struct ReadPlan {
    pub(crate) entries: Vec<(String, KeyPlan)>,
}

impl ReadPlan {
    /// True when no key was requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of planned keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Round trip 1: read address tags and child registries for each key
///
/// Requested keys are validated and deduplicated; order is preserved.
pub fn resolve_plan(backend: &dyn Backend, keys: &[String]) -> Result<ReadPlan> {
    let mut seen = HashSet::new();
    let mut requested = Vec::new();
    for key in keys {
        validate_key(key)?;
        if seen.insert(key.as_str()) {
            requested.push(key.clone());
        }
    }
    if requested.is_empty() {
        return Ok(ReadPlan {
            entries: Vec::new(),
        });
    }

    let mut executor = BatchExecutor::new(backend);
    for key in &requested {
        executor.enqueue(Operation::labeled(
            Command::GetMany {
                keys: vec![
                    key::address_key(key),
                    key::list_registry_key(key),
                    key::set_registry_key(key),
                ],
            },
            key.clone(),
        ));
    }
    let mut results = executor.execute()?;

    let mut entries = Vec::with_capacity(requested.len());
    for key in requested {
        let reply = results
            .take(&key)
            .ok_or_else(|| Error::Usage(format!("missing metadata reply for key {key:?}")))?;
        let mut values = reply.into_values()?.into_iter();
        let tag = values.next().flatten();
        let list_registry = values.next().flatten();
        let set_registry = values.next().flatten();

        let plan = match &tag {
            None => KeyPlan::Native,
            Some(text) => match AddressTag::parse(text) {
                Some(AddressTag::List) => KeyPlan::List,
                Some(AddressTag::Set) => KeyPlan::Set,
                Some(AddressTag::Hashmap) => KeyPlan::Map {
                    list_fields: split_registry(list_registry),
                    set_fields: split_registry(set_registry),
                },
                None => {
                    return Err(Error::Value(format!(
                        "unknown address tag {text:?} for key {key:?}"
                    )))
                }
            },
        };
        entries.push((key, plan));
    }
    debug!(target: "redmap::read", keys = entries.len(), "resolved read plan");
    Ok(ReadPlan { entries })
}

/// Split a `$`-joined registry payload into field names
fn split_registry(payload: Option<String>) -> Vec<String> {
    payload
        .map(|names| {
            names
                .split(META_SEPARATOR)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Round trip 2: execute the typed fetches and rebuild each record
///
/// Absent keys are omitted from the result, never mapped to a placeholder.
pub fn fetch_plan(backend: &dyn Backend, plan: &ReadPlan) -> Result<HashMap<String, Value>> {
    if plan.is_empty() {
        return Ok(HashMap::new());
    }

    let mut executor = BatchExecutor::new(backend);
    for (key, key_plan) in &plan.entries {
        match key_plan {
            KeyPlan::Native => executor.enqueue(Operation::labeled(
                NativeStore::fetch_many(native_candidates(key)),
                key.clone(),
            )),
            KeyPlan::List => {
                executor.enqueue(Operation::labeled(ListStore::fetch(key), key.clone()))
            }
            KeyPlan::Set => executor.enqueue(Operation::labeled(SetStore::fetch(key), key.clone())),
            KeyPlan::Map {
                list_fields,
                set_fields,
            } => {
                executor.enqueue(Operation::labeled(HashStore::fetch(key), key.clone()));
                for field in list_fields {
                    let child = key::sub_key(key, field);
                    executor.enqueue(Operation::labeled(ListStore::fetch(&child), child.clone()));
                }
                for field in set_fields {
                    let child = key::sub_key(key, field);
                    executor.enqueue(Operation::labeled(SetStore::fetch(&child), child.clone()));
                }
            }
        }
    }
    let mut results = executor.execute()?;

    let mut records = HashMap::new();
    for (key, key_plan) in &plan.entries {
        let reply = results
            .take(key)
            .ok_or_else(|| Error::Usage(format!("missing fetch reply for key {key:?}")))?;
        let value = match key_plan {
            KeyPlan::Native => decode_native(key, reply)?,
            KeyPlan::List => {
                let items = ListStore::decode(reply)?;
                (!items.is_empty()).then(|| Value::List(items))
            }
            KeyPlan::Set => {
                let members = SetStore::decode(reply)?;
                (!members.is_empty()).then(|| Value::Set(members))
            }
            KeyPlan::Map {
                list_fields,
                set_fields,
            } => {
                let mut map = unflatten_fields(HashStore::decode(reply)?)?;
                for field in list_fields {
                    let child = key::sub_key(key, field);
                    let child_reply = results.take(&child).ok_or_else(|| {
                        Error::Usage(format!("missing fetch reply for sub-key {child:?}"))
                    })?;
                    let items = ListStore::decode(child_reply)?;
                    if !items.is_empty() {
                        map.insert(field.clone(), Value::List(items));
                    }
                }
                for field in set_fields {
                    let child = key::sub_key(key, field);
                    let child_reply = results.take(&child).ok_or_else(|| {
                        Error::Usage(format!("missing fetch reply for sub-key {child:?}"))
                    })?;
                    let members = SetStore::decode(child_reply)?;
                    if !members.is_empty() {
                        map.insert(field.clone(), Value::Set(members));
                    }
                }
                // Tag present but every payload gone: treat as absent
                if map.is_empty() {
                    warn!(target: "redmap::read", key, "address tag with no payload");
                }
                (!map.is_empty()).then(|| Value::Map(map))
            }
        };
        if let Some(value) = value {
            records.insert(key.clone(), value);
        }
    }
    Ok(records)
}

/// Resolve and fetch in one call (the two round trips run back to back)
pub fn load_records(backend: &dyn Backend, keys: &[String]) -> Result<HashMap<String, Value>> {
    let plan = resolve_plan(backend, keys)?;
    fetch_plan(backend, &plan)
}

/// The three physical keys a tag-less logical key may live under
fn native_candidates(key: &str) -> Vec<String> {
    vec![
        key.to_string(),
        key::inline_sentinel(InlineKind::List, key),
        key::inline_sentinel(InlineKind::Set, key),
    ]
}

/// Decode a native-candidate `MGET` reply: plain scalar wins, then the
/// inline list sentinel, then the inline set sentinel; all absent means
/// the key is absent
fn decode_native(key: &str, reply: redmap_store::Reply) -> Result<Option<Value>> {
    let candidates = native_candidates(key);
    let decoded = NativeStore::decode_many(&candidates, reply)?;
    if let Some(scalar) = decoded.get(&candidates[0]) {
        return Ok(Some(Value::Scalar(scalar.clone())));
    }
    if let Some(scalar) = decoded.get(&candidates[1]) {
        let items = codec::decode_inline(inline_payload(&candidates[1], scalar)?)?;
        return Ok(Some(Value::List(items)));
    }
    if let Some(scalar) = decoded.get(&candidates[2]) {
        let items = codec::decode_inline(inline_payload(&candidates[2], scalar)?)?;
        return Ok(Some(Value::Set(items.into_iter().collect())));
    }
    Ok(None)
}

/// An inline-iterable payload is always stored as an encoded string
fn inline_payload<'a>(location: &str, scalar: &'a Scalar) -> Result<&'a str> {
    scalar.as_str().ok_or_else(|| {
        Error::Value(format!(
            "inline iterable at {location:?} holds a non-string payload"
        ))
    })
}

/// Rebuild a nested map from flattened hash fields
///
/// Sentinel-prefixed fields decode into inline lists/sets at their path;
/// every other field is a scalar leaf. Path segments are split on `|`.
fn unflatten_fields(fields: HashMap<String, Scalar>) -> Result<HashMap<String, Value>> {
    let mut map = HashMap::new();
    for (field, scalar) in fields {
        match key::strip_sentinel(&field) {
            Some((kind, path)) => {
                let items = codec::decode_inline(inline_payload(&field, &scalar)?)?;
                let value = match kind {
                    InlineKind::List => Value::List(items),
                    InlineKind::Set => Value::Set(items.into_iter().collect()),
                };
                insert_path(&mut map, path, value);
            }
            None => insert_path(&mut map, &field, Value::Scalar(scalar)),
        }
    }
    Ok(map)
}

/// Insert a value at a `|`-separated path, creating intermediate maps
fn insert_path(map: &mut HashMap<String, Value>, path: &str, value: Value) {
    match path.split_once(PATH_SEPARATOR) {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Map(HashMap::new()));
            if let Value::Map(inner) = child {
                insert_path(inner, rest, value);
            } else {
                // A scalar and a map collide at the same segment; the
                // flattener never produces this, but a raw-store writer
                // could. Last writer wins, nested under a fresh map.
                let mut inner = HashMap::new();
                insert_path(&mut inner, rest, value);
                *child = Value::Map(inner);
            }
        }
    }
}
