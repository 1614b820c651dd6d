//! Scalar and record value types for redmap
//!
//! This module defines:
//! - Scalar: the closed set of seven storable scalar types
//! - Value: a logical record value (scalar, list, set, or nested map)
//!
//! ## Type Rules
//!
//! - Seven scalar types only: str, int, bool, float, datetime, date, time
//! - No implicit coercions: `Int(1) != Float(1.0)`
//! - Collections hold scalars only (one level of nesting); maps may nest
//!   maps to arbitrary depth for scalar fields
//! - `Value::Null` marks an unset value and is dropped on write
//!
//! ## Float Equality
//!
//! `Scalar` must implement `Eq + Hash` so scalars can live in `HashSet`s.
//! Floats therefore compare by bit pattern: `NaN == NaN`, `0.0 != -0.0`.
//! This is a deliberate departure from IEEE-754 comparison semantics and is
//! exactly the equality the codec round-trip preserves.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

/// A storable scalar value
///
/// This is the closed type set the codec is defined over. Every scalar has
/// a canonical textual encoding with an embedded type-name prefix; see
/// [`crate::codec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    /// UTF-8 string
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// 64-bit floating point
    Float(f64),
    /// Naive datetime (no timezone), ISO-8601 encoded
    DateTime(NaiveDateTime),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            // Bit equality so Eq/Hash are consistent (see module docs)
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::DateTime(a), Scalar::DateTime(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            (Scalar::Time(a), Scalar::Time(b)) => a == b,
            // Different types are never equal
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Str(s) => s.hash(state),
            Scalar::Int(i) => i.hash(state),
            Scalar::Bool(b) => b.hash(state),
            Scalar::Float(f) => f.to_bits().hash(state),
            Scalar::DateTime(dt) => dt.hash(state),
            Scalar::Date(d) => d.hash(state),
            Scalar::Time(t) => t.hash(state),
        }
    }
}

impl Scalar {
    /// Get the canonical type name, as used in the encoded prefix
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "str",
            Scalar::Int(_) => "int",
            Scalar::Bool(_) => "bool",
            Scalar::Float(_) => "float",
            Scalar::DateTime(_) => "datetime",
            Scalar::Date(_) => "date",
            Scalar::Time(_) => "time",
        }
    }

    /// Get as &str if this is a Str value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i as i64)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(dt: NaiveDateTime) -> Self {
        Scalar::DateTime(dt)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Scalar::Date(d)
    }
}

impl From<NaiveTime> for Scalar {
    fn from(t: NaiveTime) -> Self {
        Scalar::Time(t)
    }
}

/// A logical record value
///
/// One stored record maps a logical key to one `Value`. The physical
/// footprint depends on the variant: a scalar is one native key, a list or
/// set is one collection key plus an address tag, and a map flattens into a
/// hash plus optional sub-keys (see the engine crate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Unset marker; dropped entirely on write
    Null,
    /// Single scalar
    Scalar(Scalar),
    /// Ordered sequence of scalars
    List(Vec<Scalar>),
    /// Unordered set of scalars
    Set(HashSet<Scalar>),
    /// Nested mapping of field names to values
    Map(HashMap<String, Value>),
}

impl Value {
    /// Check if this is the Null marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check whether the value is empty: Null, or a collection/map with no
    /// elements. Empty values are skipped on write (absence means "unset").
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Set(members) => members.is_empty(),
            Value::Map(fields) => fields.is_empty(),
        }
    }

    /// Get as Scalar if this is a Scalar value
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Scalar] if this is a List value
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as &HashSet if this is a Set value
    pub fn as_set(&self) -> Option<&HashSet<Scalar>> {
        match self {
            Value::Set(members) => Some(members),
            _ => None,
        }
    }

    /// Get as &HashMap if this is a Map value
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Scalar(Scalar::Int(i as i64))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Scalar(Scalar::DateTime(dt))
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Scalar(Scalar::Date(d))
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Scalar(Scalar::Time(t))
    }
}

impl From<Vec<Scalar>> for Value {
    fn from(items: Vec<Scalar>) -> Self {
        Value::List(items)
    }
}

impl From<HashSet<Scalar>> for Value {
    fn from(members: HashSet<Scalar>) -> Self {
        Value::Set(members)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(fields: HashMap<String, Value>) -> Self {
        Value::Map(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(Scalar::Str("".into()).type_name(), "str");
        assert_eq!(Scalar::Int(0).type_name(), "int");
        assert_eq!(Scalar::Bool(true).type_name(), "bool");
        assert_eq!(Scalar::Float(0.0).type_name(), "float");
        assert_eq!(
            Scalar::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).type_name(),
            "date"
        );
    }

    #[test]
    fn test_scalar_cross_type_inequality() {
        assert_ne!(Scalar::Int(1), Scalar::Float(1.0));
        assert_ne!(Scalar::Str("true".into()), Scalar::Bool(true));
        assert_ne!(Scalar::Int(0), Scalar::Bool(false));
    }

    #[test]
    fn test_float_bit_equality() {
        // Total equality so scalars can live in hash sets
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
        assert_ne!(Scalar::Float(0.0), Scalar::Float(-0.0));
        assert_eq!(Scalar::Float(1.5), Scalar::Float(1.5));
    }

    #[test]
    fn test_scalar_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(Scalar::Float(1.5));
        set.insert(Scalar::Float(1.5));
        set.insert(Scalar::Int(1));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Scalar::Float(1.5)));
    }

    #[test]
    fn test_scalar_from_conversions() {
        assert_eq!(Scalar::from("hi"), Scalar::Str("hi".to_string()));
        assert_eq!(Scalar::from(42i64), Scalar::Int(42));
        assert_eq!(Scalar::from(42i32), Scalar::Int(42));
        assert_eq!(Scalar::from(false), Scalar::Bool(false));
    }

    #[test]
    fn test_scalar_accessors() {
        assert_eq!(Scalar::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Scalar::Int(7).as_int(), Some(7));
        assert_eq!(Scalar::Bool(true).as_bool(), Some(true));
        assert_eq!(Scalar::Int(7).as_str(), None);
    }

    #[test]
    fn test_value_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(Value::Set(HashSet::new()).is_empty());
        assert!(Value::Map(HashMap::new()).is_empty());
        assert!(!Value::Scalar(Scalar::Int(0)).is_empty());
        assert!(!Value::List(vec![Scalar::Int(1)]).is_empty());
    }

    #[test]
    fn test_value_from_scalar_like() {
        let v: Value = 42i64.into();
        assert_eq!(v, Value::Scalar(Scalar::Int(42)));
        let v: Value = "hello".into();
        assert_eq!(v.as_scalar().and_then(Scalar::as_str), Some("hello"));
    }

    #[test]
    fn test_value_from_collections() {
        let v: Value = vec![Scalar::Int(1), Scalar::Int(2)].into();
        assert_eq!(v.as_list().map(<[Scalar]>::len), Some(2));

        let mut members = HashSet::new();
        members.insert(Scalar::Str("x".into()));
        let v: Value = members.clone().into();
        assert_eq!(v.as_set(), Some(&members));
    }

    #[test]
    fn test_nested_map_equality() {
        let mut inner = HashMap::new();
        inner.insert("x".to_string(), Value::from(1i64));
        let mut outer1 = HashMap::new();
        outer1.insert("nested".to_string(), Value::Map(inner.clone()));
        let mut outer2 = HashMap::new();
        outer2.insert("nested".to_string(), Value::Map(inner));
        assert_eq!(Value::Map(outer1), Value::Map(outer2));
    }

    #[test]
    fn test_value_serde_roundtrip() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), Value::from("Bob"));
        fields.insert("score".to_string(), Value::from(9.5f64));
        let value = Value::Map(fields);

        let serialized = serde_json::to_string(&value).unwrap();
        let deserialized: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value, deserialized);
    }

    #[test]
    fn test_temporal_scalar_equality() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(Scalar::Date(d), Scalar::Date(d));
        let t = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(Scalar::Time(t), Scalar::Time(t));
        assert_ne!(Scalar::Date(d), Scalar::DateTime(d.and_time(t)));
    }
}
