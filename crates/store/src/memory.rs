//! In-memory backend
//!
//! A mutex-guarded map of typed entries, used by the test suites and for
//! embedded deployments. Semantics follow the remote store it stands in
//! for:
//!
//! - every entry has exactly one type (string, list, set, hash); a command
//!   of the wrong type fails with a store error, like `WRONGTYPE`
//! - `MGET` returns nil for absent keys and for keys of the wrong type
//! - expiry is honored lazily on access; no background threads
//! - `run_atomic` is all-or-nothing: commands apply to a scratch copy that
//!   replaces the live map only when every command succeeded

use crate::command::Command;
use crate::reply::Reply;
use crate::traits::Backend;
use parking_lot::Mutex;
use redmap_core::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
enum Datum {
    Str(String),
    List(Vec<String>),
    Set(HashSet<String>),
    Hash(HashMap<String, String>),
}

impl Datum {
    fn kind(&self) -> &'static str {
        match self {
            Datum::Str(_) => "string",
            Datum::List(_) => "list",
            Datum::Set(_) => "set",
            Datum::Hash(_) => "hash",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    datum: Datum,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(datum: Datum) -> Self {
        Self {
            datum,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |deadline| deadline <= now)
    }
}

/// Mutex-guarded in-memory store
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys; test and diagnostics helper
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// True when no live keys remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn wrong_type(key: &str, entry: &Entry, wanted: &'static str) -> Error {
    Error::Store(format!(
        "WRONGTYPE key {key:?} holds {}, command needs {wanted}",
        entry.datum.kind()
    ))
}

/// Drop the entry if it has expired, then return a live mutable reference
fn live_entry<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
    now: Instant,
) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(|e| e.is_expired(now)) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

fn apply(entries: &mut HashMap<String, Entry>, command: Command, now: Instant) -> Result<Reply> {
    match command {
        Command::Set { key, value } => {
            entries.insert(key, Entry::new(Datum::Str(value)));
            Ok(Reply::Unit)
        }
        Command::SetMany { pairs } => {
            for (key, value) in pairs {
                entries.insert(key, Entry::new(Datum::Str(value)));
            }
            Ok(Reply::Unit)
        }
        Command::Get { key } => match live_entry(entries, &key, now) {
            None => Ok(Reply::Value(None)),
            Some(entry) => match &entry.datum {
                Datum::Str(s) => Ok(Reply::Value(Some(s.clone()))),
                _ => Err(wrong_type(&key, entry, "string")),
            },
        },
        Command::GetMany { keys } => {
            let mut values = Vec::with_capacity(keys.len());
            for key in keys {
                // MGET never errors: wrong-type keys read as nil
                let value = match live_entry(entries, &key, now) {
                    Some(Entry {
                        datum: Datum::Str(s),
                        ..
                    }) => Some(s.clone()),
                    _ => None,
                };
                values.push(value);
            }
            Ok(Reply::Values(values))
        }
        Command::Delete { keys } => {
            let mut removed = 0;
            for key in keys {
                // purge if expired so the count only covers live keys
                live_entry(entries, &key, now);
                if entries.remove(&key).is_some() {
                    removed += 1;
                }
            }
            Ok(Reply::Int(removed))
        }
        Command::Exists { keys } => {
            let mut present = 0;
            for key in keys {
                if live_entry(entries, &key, now).is_some() {
                    present += 1;
                }
            }
            Ok(Reply::Int(present))
        }
        Command::Expire { key, ttl } => match live_entry(entries, &key, now) {
            None => Ok(Reply::Bool(false)),
            Some(entry) => {
                entry.expires_at = Some(now + ttl);
                Ok(Reply::Bool(true))
            }
        },
        Command::PushList { key, items } => match live_entry(entries, &key, now) {
            None => {
                entries.insert(key, Entry::new(Datum::List(items)));
                Ok(Reply::Unit)
            }
            Some(entry) => match &mut entry.datum {
                Datum::List(existing) => {
                    existing.extend(items);
                    Ok(Reply::Unit)
                }
                _ => Err(wrong_type(&key, entry, "list")),
            },
        },
        Command::RangeList { key } => match live_entry(entries, &key, now) {
            None => Ok(Reply::Items(Vec::new())),
            Some(entry) => match &entry.datum {
                Datum::List(items) => Ok(Reply::Items(items.clone())),
                _ => Err(wrong_type(&key, entry, "list")),
            },
        },
        Command::AddSet { key, members } => match live_entry(entries, &key, now) {
            None => {
                entries.insert(key, Entry::new(Datum::Set(members.into_iter().collect())));
                Ok(Reply::Unit)
            }
            Some(entry) => match &mut entry.datum {
                Datum::Set(existing) => {
                    existing.extend(members);
                    Ok(Reply::Unit)
                }
                _ => Err(wrong_type(&key, entry, "set")),
            },
        },
        Command::Members { key } => match live_entry(entries, &key, now) {
            None => Ok(Reply::Items(Vec::new())),
            Some(entry) => match &entry.datum {
                Datum::Set(members) => Ok(Reply::Items(members.iter().cloned().collect())),
                _ => Err(wrong_type(&key, entry, "set")),
            },
        },
        Command::PutHash { key, fields } => match live_entry(entries, &key, now) {
            None => {
                entries.insert(key, Entry::new(Datum::Hash(fields.into_iter().collect())));
                Ok(Reply::Unit)
            }
            Some(entry) => match &mut entry.datum {
                Datum::Hash(existing) => {
                    existing.extend(fields);
                    Ok(Reply::Unit)
                }
                _ => Err(wrong_type(&key, entry, "hash")),
            },
        },
        Command::GetHash { key } => match live_entry(entries, &key, now) {
            None => Ok(Reply::Fields(HashMap::new())),
            Some(entry) => match &entry.datum {
                Datum::Hash(fields) => Ok(Reply::Fields(fields.clone())),
                _ => Err(wrong_type(&key, entry, "hash")),
            },
        },
        Command::FlushAll => {
            entries.clear();
            Ok(Reply::Unit)
        }
    }
}

impl Backend for MemoryBackend {
    fn run(&self, command: Command) -> Result<Reply> {
        let mut entries = self.entries.lock();
        apply(&mut entries, command, Instant::now())
    }

    fn run_atomic(&self, commands: Vec<Command>) -> Result<Vec<Reply>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        // All-or-nothing: apply to a scratch copy, swap on full success
        let mut scratch = entries.clone();
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            replies.push(apply(&mut scratch, command, now)?);
        }
        *entries = scratch;
        Ok(replies)
    }
}
