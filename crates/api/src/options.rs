//! Per-write options

use std::time::Duration;

/// Options for a single write call
///
/// ## Example
///
/// ```
/// use redmap_api::SetOptions;
/// use std::time::Duration;
///
/// let options = SetOptions::new()
///     .ttl(Duration::from_secs(60))
///     .separator(";");
/// assert_eq!(options.separator.as_deref(), Some(";"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Time-to-live applied to every physical key of the record
    pub ttl: Option<Duration>,
    /// Inline separator: when set, nested lists and sets are serialized
    /// into single strings instead of their own physical keys
    pub separator: Option<String>,
}

impl SetOptions {
    /// Options with no TTL and no inline separator
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire the whole record after `ttl`
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Serialize nested collections inline with this separator
    ///
    /// The separator must be non-empty and must not contain `$` or `|`;
    /// violations surface as a value error at write time.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_empty() {
        let options = SetOptions::new();
        assert_eq!(options.ttl, None);
        assert_eq!(options.separator, None);
    }

    #[test]
    fn test_builder_chains() {
        let options = SetOptions::new().ttl(Duration::from_secs(1)).separator(",");
        assert_eq!(options.ttl, Some(Duration::from_secs(1)));
        assert_eq!(options.separator.as_deref(), Some(","));
    }
}
