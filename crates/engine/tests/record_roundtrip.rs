//! End-to-end record round trips through the write and read paths.

use chrono::{NaiveDate, NaiveTime};
use redmap_core::{Scalar, Value};
use redmap_engine::{delete_records, load_records, store_record};
use redmap_store::MemoryBackend;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn load_one(backend: &MemoryBackend, key: &str) -> Option<Value> {
    load_records(backend, &keys(&[key])).unwrap().remove(key)
}

#[test]
fn test_deeply_nested_record_roundtrip() {
    let backend = MemoryBackend::new();

    let mut address = HashMap::new();
    address.insert("city".to_string(), Value::from("Paris"));
    address.insert(
        "coords".to_string(),
        Value::List(vec![Scalar::Float(48.85), Scalar::Float(2.35)]),
    );

    let mut profile = HashMap::new();
    profile.insert("address".to_string(), Value::Map(address));
    profile.insert(
        "born".to_string(),
        Value::from(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap()),
    );

    let mut tags = HashSet::new();
    tags.insert(Scalar::Str("math".into()));
    tags.insert(Scalar::Str("computing".into()));

    let mut record = HashMap::new();
    record.insert("name".to_string(), Value::from("Ada Lovelace"));
    record.insert("age".to_string(), Value::from(36i64));
    record.insert("active".to_string(), Value::from(true));
    record.insert(
        "wakeup".to_string(),
        Value::from(NaiveTime::from_hms_opt(7, 30, 0).unwrap()),
    );
    record.insert("profile".to_string(), Value::Map(profile));
    record.insert(
        "scores".to_string(),
        Value::List(vec![Scalar::Int(10), Scalar::Int(9), Scalar::Int(10)]),
    );
    record.insert("tags".to_string(), Value::Set(tags));
    let record = Value::Map(record);

    store_record(&backend, "user:ada", &record, None, None).unwrap();
    assert_eq!(load_one(&backend, "user:ada"), Some(record));
}

#[test]
fn test_temporal_scalars_roundtrip_with_fractions() {
    let backend = MemoryBackend::new();
    let dt = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_micro_opt(12, 30, 45, 123_456)
        .unwrap();
    store_record(&backend, "when", &Value::from(dt), None, None).unwrap();
    assert_eq!(load_one(&backend, "when"), Some(Value::from(dt)));
}

#[test]
fn test_nulls_inside_maps_are_dropped_on_write() {
    let backend = MemoryBackend::new();
    let mut map = HashMap::new();
    map.insert("kept".to_string(), Value::from(1i64));
    map.insert("dropped".to_string(), Value::Null);
    map.insert("empty".to_string(), Value::List(vec![]));
    store_record(&backend, "rec", &Value::Map(map), None, None).unwrap();

    let mut expected = HashMap::new();
    expected.insert("kept".to_string(), Value::from(1i64));
    assert_eq!(load_one(&backend, "rec"), Some(Value::Map(expected)));
}

#[test]
fn test_ttl_expires_whole_record() {
    let backend = MemoryBackend::new();
    let mut map = HashMap::new();
    map.insert("name".to_string(), Value::from("Ada"));
    map.insert("scores".to_string(), Value::List(vec![Scalar::Int(1)]));
    store_record(
        &backend,
        "user",
        &Value::Map(map),
        Some(Duration::from_millis(5)),
        None,
    )
    .unwrap();

    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(load_one(&backend, "user"), None);
    // no partial footprint survives the expiry
    assert!(!delete_records(&backend, &keys(&["user"])).unwrap());
}

#[test]
fn test_supersession_roundtrip_across_shapes() {
    let backend = MemoryBackend::new();
    store_record(
        &backend,
        "k",
        &Value::List(vec![Scalar::Int(1)]),
        None,
        None,
    )
    .unwrap();
    store_record(&backend, "k", &Value::from("replaced"), None, None).unwrap();
    assert_eq!(load_one(&backend, "k"), Some(Value::from("replaced")));

    let mut map = HashMap::new();
    map.insert("f".to_string(), Value::from(2i64));
    store_record(&backend, "k", &Value::Map(map.clone()), None, None).unwrap();
    assert_eq!(load_one(&backend, "k"), Some(Value::Map(map)));
}
