//! Key validation and physical-key construction
//!
//! Two characters are reserved in logical keys and nested field names:
//!
//! - `$` joins a logical key to its metadata suffixes (`user$addr`) and to
//!   its collection sub-keys (`user$tags`)
//! - `|` joins nested map path segments in flattened hash fields
//!   (`profile|name`) and marks inline-iterable sentinels (`|lsep|key`)
//!
//! A key containing either character is rejected with a key error before
//! any store mutation. The validation is deliberately strict: there is no
//! escaping scheme.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Joins a logical key to metadata suffixes and sub-keys
pub const META_SEPARATOR: char = '$';

/// Joins flattened path segments; also delimits sentinel markers
pub const PATH_SEPARATOR: char = '|';

/// Metadata suffix recording the physical encoding of a key
pub const ADDRESS_SUFFIX: &str = "addr";

/// Metadata suffix holding the direct-child list field registry
pub const LIST_SUFFIX: &str = "list";

/// Metadata suffix holding the direct-child set field registry
pub const SET_SUFFIX: &str = "set";

/// Sentinel marker for an inline-encoded list
pub const LIST_MARKER: &str = "lsep";

/// Sentinel marker for an inline-encoded set
pub const SET_MARKER: &str = "ssep";

/// Key validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The key contains one of the reserved separator characters
    #[error("key {key:?} contains reserved separator {separator:?}")]
    ReservedSeparator {
        /// Offending key or field name
        key: String,
        /// Which reserved character was found
        separator: char,
    },
}

/// Validate a logical key or nested field name
///
/// # Examples
///
/// ```
/// use redmap_core::key::validate_key;
///
/// assert!(validate_key("user:123").is_ok());
/// assert!(validate_key("a$b").is_err());
/// assert!(validate_key("a|b").is_err());
/// ```
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    for separator in [META_SEPARATOR, PATH_SEPARATOR] {
        if key.contains(separator) {
            return Err(KeyError::ReservedSeparator {
                key: key.to_string(),
                separator,
            });
        }
    }
    Ok(())
}

/// Physical encoding variant recorded for a top-level logical key
///
/// Written once per non-scalar top-level key in the same atomic batch as
/// the data it describes; consulted once per key at the start of any read.
/// Top-level scalars carry no tag (documented asymmetry): tag absence means
/// the reader probes the native candidates instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressTag {
    /// Ordered collection stored under its own physical key
    List,
    /// Unordered collection stored under its own physical key
    Set,
    /// Flattened map stored as a hash plus optional sub-keys
    Hashmap,
}

impl AddressTag {
    /// Stored textual form of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressTag::List => "list",
            AddressTag::Set => "set",
            AddressTag::Hashmap => "hmap",
        }
    }

    /// Parse the stored textual form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "list" => Some(AddressTag::List),
            "set" => Some(AddressTag::Set),
            "hmap" => Some(AddressTag::Hashmap),
            _ => None,
        }
    }
}

/// Kind marker carried by an inline-iterable sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    /// Decoded elements form an ordered list
    List,
    /// Decoded elements form an unordered set
    Set,
}

/// Address-tag key for a logical key: `<key>$addr`
pub fn address_key(key: &str) -> String {
    format!("{key}{META_SEPARATOR}{ADDRESS_SUFFIX}")
}

/// List-registry key for a logical key: `<key>$list`
pub fn list_registry_key(key: &str) -> String {
    format!("{key}{META_SEPARATOR}{LIST_SUFFIX}")
}

/// Set-registry key for a logical key: `<key>$set`
pub fn set_registry_key(key: &str) -> String {
    format!("{key}{META_SEPARATOR}{SET_SUFFIX}")
}

/// Sub-key for a direct-child collection field: `<key>$<field>`
pub fn sub_key(key: &str, field: &str) -> String {
    format!("{key}{META_SEPARATOR}{field}")
}

/// Sentinel key or field for an inline iterable: `|lsep|<path>` / `|ssep|<path>`
pub fn inline_sentinel(kind: InlineKind, path: &str) -> String {
    let marker = match kind {
        InlineKind::List => LIST_MARKER,
        InlineKind::Set => SET_MARKER,
    };
    format!("{PATH_SEPARATOR}{marker}{PATH_SEPARATOR}{path}")
}

/// Strip an inline sentinel prefix, returning the kind and original path
///
/// Returns `None` for keys and fields that carry no sentinel marker.
pub fn strip_sentinel(key: &str) -> Option<(InlineKind, &str)> {
    let list_prefix = format!("{PATH_SEPARATOR}{LIST_MARKER}{PATH_SEPARATOR}");
    let set_prefix = format!("{PATH_SEPARATOR}{SET_MARKER}{PATH_SEPARATOR}");
    if let Some(rest) = key.strip_prefix(&list_prefix) {
        return Some((InlineKind::List, rest));
    }
    if let Some(rest) = key.strip_prefix(&set_prefix) {
        return Some((InlineKind::Set, rest));
    }
    None
}

/// Join a parent path and a field name with the path separator
pub fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Valid keys ===

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("mykey").is_ok());
        assert!(validate_key("user:123").is_ok());
        assert!(validate_key("with spaces").is_ok());
        assert!(validate_key("").is_ok()); // emptiness is the store's concern
    }

    // === Invalid keys ===

    #[test]
    fn test_reserved_meta_separator() {
        let result = validate_key("a$b");
        assert_eq!(
            result,
            Err(KeyError::ReservedSeparator {
                key: "a$b".to_string(),
                separator: '$',
            })
        );
    }

    #[test]
    fn test_reserved_path_separator() {
        let result = validate_key("a|b");
        assert_eq!(
            result,
            Err(KeyError::ReservedSeparator {
                key: "a|b".to_string(),
                separator: '|',
            })
        );
    }

    #[test]
    fn test_reserved_at_edges() {
        assert!(validate_key("$lead").is_err());
        assert!(validate_key("trail$").is_err());
        assert!(validate_key("|").is_err());
    }

    // === Physical key construction ===

    #[test]
    fn test_metadata_keys() {
        assert_eq!(address_key("user"), "user$addr");
        assert_eq!(list_registry_key("user"), "user$list");
        assert_eq!(set_registry_key("user"), "user$set");
        assert_eq!(sub_key("user", "scores"), "user$scores");
    }

    #[test]
    fn test_inline_sentinels() {
        assert_eq!(inline_sentinel(InlineKind::List, "k"), "|lsep|k");
        assert_eq!(inline_sentinel(InlineKind::Set, "a|b"), "|ssep|a|b");
    }

    #[test]
    fn test_strip_sentinel() {
        assert_eq!(strip_sentinel("|lsep|k"), Some((InlineKind::List, "k")));
        assert_eq!(
            strip_sentinel("|ssep|a|b"),
            Some((InlineKind::Set, "a|b"))
        );
        assert_eq!(strip_sentinel("plain"), None);
        assert_eq!(strip_sentinel("lsep|k"), None);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "name"), "name");
        assert_eq!(join_path("profile", "name"), "profile|name");
        assert_eq!(join_path("a|b", "c"), "a|b|c");
    }

    // === Address tags ===

    #[test]
    fn test_address_tag_roundtrip() {
        for tag in [AddressTag::List, AddressTag::Set, AddressTag::Hashmap] {
            assert_eq!(AddressTag::parse(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn test_address_tag_parse_unknown() {
        assert_eq!(AddressTag::parse("scalar"), None);
        assert_eq!(AddressTag::parse(""), None);
    }
}
