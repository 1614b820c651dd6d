//! Reversible scalar codec with embedded type tags
//!
//! Every scalar is stored as a string made of the canonical type name
//! followed by a canonical textual payload: `str…`, `int42`, `boolTrue`,
//! `float3.14`, `datetime2024-01-01T00:00:00`, `date2024-01-01`,
//! `time00:00:00`. Decoding matches the prefix against the fixed type-name
//! list in priority order (`datetime` is tested before `date`, so the more
//! specific name always wins) and dispatches on an explicit enum — never on
//! runtime type names.
//!
//! This module also hosts the inline-iterable codec: a list or set nested
//! inside a hash field is serialized into one string that embeds its own
//! separator, so the decoder needs no out-of-band knowledge:
//! `<sep>|<enc(e1)><sep><enc(e2)>…`.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error as ThisError;

/// Type names in decode priority order (most specific first where one name
/// prefixes another: `datetime` before `date`)
pub const TYPE_NAMES: [&str; 7] = ["str", "int", "bool", "float", "datetime", "date", "time"];

/// Separator used for inline iterables when the caller supplies none
pub const DEFAULT_INLINE_SEPARATOR: &str = ",";

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Decode failures
///
/// Decode never partially succeeds: either the full scalar is reconstructed
/// or one of these errors is raised.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum DecodeError {
    /// The encoded value does not start with any known type name
    #[error("unknown type prefix in encoded value {0:?}")]
    UnknownPrefix(String),

    /// The payload after the type name failed type-specific parsing
    #[error("malformed {type_name} payload {payload:?}")]
    Malformed {
        /// Canonical type name that was matched
        type_name: &'static str,
        /// Payload that failed to parse
        payload: String,
    },

    /// An inline-iterable string is missing its embedded separator header
    #[error("malformed inline iterable {0:?}")]
    MalformedInline(String),
}

/// Encode a scalar into its tagged textual form
///
/// Encoding is injective per type: two distinct scalars of the same type
/// never produce the same string, and the prefix identifies the type
/// unambiguously.
pub fn encode(value: &Scalar) -> String {
    match value {
        Scalar::Str(s) => format!("str{s}"),
        Scalar::Int(i) => format!("int{i}"),
        Scalar::Bool(b) => format!("bool{}", if *b { "True" } else { "False" }),
        Scalar::Float(f) => format!("float{f}"),
        Scalar::DateTime(dt) => format!("datetime{}", dt.format(DATETIME_FORMAT)),
        Scalar::Date(d) => format!("date{}", d.format(DATE_FORMAT)),
        Scalar::Time(t) => format!("time{}", t.format(TIME_FORMAT)),
    }
}

/// Decode a tagged textual form back into a scalar
pub fn decode(encoded: &str) -> std::result::Result<Scalar, DecodeError> {
    for name in TYPE_NAMES {
        if let Some(payload) = encoded.strip_prefix(name) {
            return decode_payload(name, payload);
        }
    }
    Err(DecodeError::UnknownPrefix(encoded.to_string()))
}

fn decode_payload(type_name: &'static str, payload: &str) -> std::result::Result<Scalar, DecodeError> {
    let malformed = || DecodeError::Malformed {
        type_name,
        payload: payload.to_string(),
    };
    match type_name {
        "str" => Ok(Scalar::Str(payload.to_string())),
        "int" => payload.parse::<i64>().map(Scalar::Int).map_err(|_| malformed()),
        "bool" => match payload {
            "True" => Ok(Scalar::Bool(true)),
            "False" => Ok(Scalar::Bool(false)),
            _ => Err(malformed()),
        },
        "float" => payload.parse::<f64>().map(Scalar::Float).map_err(|_| malformed()),
        "datetime" => NaiveDateTime::parse_from_str(payload, DATETIME_FORMAT)
            .map(Scalar::DateTime)
            .map_err(|_| malformed()),
        "date" => NaiveDate::parse_from_str(payload, DATE_FORMAT)
            .map(Scalar::Date)
            .map_err(|_| malformed()),
        "time" => NaiveTime::parse_from_str(payload, TIME_FORMAT)
            .map(Scalar::Time)
            .map_err(|_| malformed()),
        _ => unreachable!("type name not in TYPE_NAMES"),
    }
}

/// Validate a caller-supplied inline separator
///
/// The separator must be non-empty and must not contain either reserved
/// separator character, since it is embedded verbatim in the stored value.
pub fn validate_separator(separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(Error::Value("inline separator cannot be empty".to_string()));
    }
    if separator.contains(crate::key::META_SEPARATOR) || separator.contains(crate::key::PATH_SEPARATOR)
    {
        return Err(Error::Value(format!(
            "inline separator {separator:?} contains a reserved character"
        )));
    }
    Ok(())
}

/// Serialize an iterable of scalars into one inline string
///
/// The separator is prepended and delimited by `|`, so the decoder can
/// recover it without out-of-band knowledge. An element whose encoded form
/// contains the separator is a value error, raised before any store
/// mutation.
pub fn encode_inline<'a, I>(items: I, separator: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a Scalar>,
{
    let mut encoded = Vec::new();
    for item in items {
        let enc = encode(item);
        if enc.contains(separator) {
            return Err(Error::Value(format!(
                "inline separator {separator:?} appears in encoded element {enc:?}"
            )));
        }
        encoded.push(enc);
    }
    Ok(format!("{separator}|{}", encoded.join(separator)))
}

/// Decode an inline string back into its scalar elements
///
/// The caller decides whether the elements form a list or a set from the
/// marker on the field key; this function only recovers the elements in
/// stored order.
pub fn decode_inline(payload: &str) -> Result<Vec<Scalar>> {
    let (separator, body) = payload
        .split_once(crate::key::PATH_SEPARATOR)
        .ok_or_else(|| DecodeError::MalformedInline(payload.to_string()))?;
    if separator.is_empty() {
        return Err(DecodeError::MalformedInline(payload.to_string()).into());
    }
    let mut items = Vec::new();
    for part in body.split(separator) {
        items.push(decode(part)?);
    }
    Ok(items)
}
