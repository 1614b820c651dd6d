//! End-to-end behavior of the public facade over the in-memory backend.

use chrono::{NaiveDate, NaiveTime};
use redmap::{Cache, Error, Scalar, SetOptions, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn sample_user() -> Value {
    let mut address = HashMap::new();
    address.insert("city".to_string(), Value::from("London"));
    address.insert(
        "zip_codes".to_string(),
        Value::List(vec![Scalar::Str("SW1".into()), Scalar::Str("SW2".into())]),
    );

    let mut profile = HashMap::new();
    profile.insert("address".to_string(), Value::Map(address));
    profile.insert(
        "born".to_string(),
        Value::from(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()),
    );

    let mut tags = HashSet::new();
    tags.insert(Scalar::Str("math".into()));
    tags.insert(Scalar::Int(1852));

    let mut user = HashMap::new();
    user.insert("name".to_string(), Value::from("Ada Lovelace"));
    user.insert("age".to_string(), Value::from(36i64));
    user.insert("height".to_string(), Value::from(1.65f64));
    user.insert("active".to_string(), Value::from(true));
    user.insert(
        "wakeup".to_string(),
        Value::from(NaiveTime::from_hms_opt(7, 0, 0).unwrap()),
    );
    user.insert(
        "scores".to_string(),
        Value::List(vec![Scalar::Int(10), Scalar::Int(9)]),
    );
    user.insert("tags".to_string(), Value::Set(tags));
    user.insert("profile".to_string(), Value::Map(profile));
    Value::Map(user)
}

#[test]
fn test_nested_record_roundtrips_losslessly() {
    let cache = Cache::in_memory();
    let user = sample_user();
    cache.set("user:ada", user.clone()).unwrap();
    assert_eq!(cache.get("user:ada").unwrap(), Some(user));
}

#[test]
fn test_nested_record_roundtrips_inline() {
    let cache = Cache::in_memory();
    let user = sample_user();
    cache
        .set_with_options("user:ada", user.clone(), &SetOptions::new().separator(";"))
        .unwrap();
    assert_eq!(cache.get("user:ada").unwrap(), Some(user));
}

#[test]
fn test_every_scalar_type_roundtrips_at_top_level() {
    let cache = Cache::in_memory();
    let values: Vec<(&str, Value)> = vec![
        ("s", Value::from("text")),
        ("i", Value::from(-7i64)),
        ("b", Value::from(false)),
        ("f", Value::from(2.5f64)),
        (
            "dt",
            Value::from(
                NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
        ),
        ("d", Value::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
        ("t", Value::from(NaiveTime::from_hms_opt(23, 59, 59).unwrap())),
    ];
    for (key, value) in &values {
        cache.set(key, value.clone()).unwrap();
    }
    for (key, value) in values {
        assert_eq!(cache.get(key).unwrap(), Some(value), "key {key}");
    }
}

#[test]
fn test_skip_policy_preserves_previous_record() {
    let cache = Cache::in_memory();
    cache.set("k", 1i64).unwrap();
    cache.set("k", Value::Null).unwrap();
    cache.set("k", Value::List(vec![])).unwrap();
    cache.set("k", Value::Map(HashMap::new())).unwrap();
    assert_eq!(cache.get("k").unwrap(), Some(Value::from(1i64)));
}

#[test]
fn test_reserved_key_is_error_without_mutation() {
    let cache = Cache::in_memory();
    assert!(matches!(cache.set("a$b", 1i64), Err(Error::Key(_))));
    assert!(matches!(cache.set("a|b", 1i64), Err(Error::Key(_))));
    assert!(matches!(cache.get("a$b"), Err(Error::Key(_))));
}

#[test]
fn test_separator_collision_is_error_without_mutation() {
    let cache = Cache::in_memory();
    let items = vec![Scalar::Str("a;b".into())];
    let err = cache
        .set_with_options("k", Value::List(items), &SetOptions::new().separator(";"))
        .unwrap_err();
    assert!(matches!(err, Error::Value(_)));
    assert_eq!(cache.get("k").unwrap(), None);
}

#[test]
fn test_get_many_omits_absent_keys() {
    let cache = Cache::in_memory();
    cache.set("a", 1i64).unwrap();
    cache.set("c", sample_user()).unwrap();
    let records = cache.get_many(&keys(&["a", "b", "c"])).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.contains_key("a"));
    assert!(records.contains_key("c"));
}

#[test]
fn test_delete_removes_whole_record() {
    let cache = Cache::in_memory();
    cache.set("user:ada", sample_user()).unwrap();
    assert!(cache.delete(&keys(&["user:ada"])).unwrap());
    assert_eq!(cache.get("user:ada").unwrap(), None);
    // a second delete finds nothing left behind
    assert!(!cache.delete(&keys(&["user:ada"])).unwrap());
}

#[test]
fn test_record_ttl_expires_every_physical_key() {
    let cache = Cache::in_memory();
    cache
        .set_with_options(
            "user:ada",
            sample_user(),
            &SetOptions::new().ttl(Duration::from_millis(5)),
        )
        .unwrap();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get("user:ada").unwrap(), None);
    assert!(!cache.delete(&keys(&["user:ada"])).unwrap());
}

#[test]
fn test_collections_replace_rather_than_merge() {
    let cache = Cache::in_memory();
    cache
        .set(
            "nums",
            Value::List(vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]),
        )
        .unwrap();
    cache.set("nums", Value::List(vec![Scalar::Int(9)])).unwrap();
    assert_eq!(
        cache.get("nums").unwrap(),
        Some(Value::List(vec![Scalar::Int(9)]))
    );
}

#[test]
fn test_shared_backend_between_cache_handles() {
    let backend = std::sync::Arc::new(redmap::MemoryBackend::new());
    let writer = Cache::new(backend.clone());
    let reader = Cache::new(backend);
    writer.set("k", 42i64).unwrap();
    assert_eq!(reader.get("k").unwrap(), Some(Value::from(42i64)));
}
