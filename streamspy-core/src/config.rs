//! Graph configuration.
//!
//! The only knob is how long a finished subscription stays attached to its
//! destination before being flushed. Longer retention keeps stale entries
//! inspectable for longer at the cost of memory.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Retention used when none is configured.
pub const DEFAULT_KEPT_DURATION: Duration = Duration::from_secs(30);

/// Retention that never flushes.
pub const KEEP_FOREVER: Duration = Duration::MAX;

/// Configuration accepted by the graph builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    /// Delay between unsubscribe and detaching the edge.
    ///
    /// `Duration::ZERO` detaches immediately; [`KEEP_FOREVER`] never does.
    pub kept_duration: Duration,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self {
            kept_duration: DEFAULT_KEPT_DURATION,
        }
    }

    pub fn with_kept_duration(mut self, kept_duration: Duration) -> Self {
        self.kept_duration = kept_duration;
        self
    }

    /// Parse a JSON config such as `{"kept_duration_ms": 100}`.
    ///
    /// A missing field keeps the default and `null` keeps edges forever.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let kept_duration = match raw.kept_duration_ms {
            None => DEFAULT_KEPT_DURATION,
            Some(None) => KEEP_FOREVER,
            Some(Some(ms)) => Duration::from_millis(ms),
        };
        Ok(Self { kept_duration })
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default, deserialize_with = "present")]
    kept_duration_ms: Option<Option<u64>>,
}

// Distinguishes an explicit `null` from a missing field.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<u64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_keeps_for_thirty_seconds() {
        assert_eq!(GraphConfig::default().kept_duration, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides_duration() {
        let config = GraphConfig::new().with_kept_duration(Duration::ZERO);
        assert_eq!(config.kept_duration, Duration::ZERO);
    }

    #[test]
    fn parses_milliseconds() {
        let config = GraphConfig::from_json(r#"{"kept_duration_ms": 100}"#).unwrap();
        assert_eq!(config.kept_duration, Duration::from_millis(100));
    }

    #[test]
    fn missing_field_uses_default() {
        let config = GraphConfig::from_json("{}").unwrap();
        assert_eq!(config.kept_duration, DEFAULT_KEPT_DURATION);
    }

    #[test]
    fn null_keeps_forever() {
        let config = GraphConfig::from_json(r#"{"kept_duration_ms": null}"#).unwrap();
        assert_eq!(config.kept_duration, KEEP_FOREVER);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = GraphConfig::from_json(r#"{"kept": 1}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_negative_durations() {
        assert!(GraphConfig::from_json(r#"{"kept_duration_ms": -5}"#).is_err());
    }
}
