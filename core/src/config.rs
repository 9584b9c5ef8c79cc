//! Client configuration.
//!
//! The timeout is a plain value threaded into every request the client
//! builds. Hosts that keep settings in files can deserialize a
//! `ClientConfig` from `{"timeout_ms": 30000}`; missing fields fall back to
//! the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Ten minutes, applied to the whole exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(600_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_ten_minutes() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(600));
    }

    #[test]
    fn with_timeout_overrides_default() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn deserializes_timeout_in_millis() {
        let config: ClientConfig = serde_json::from_str(r#"{"timeout_ms":1500}"#).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn serializes_timeout_in_millis() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json, serde_json::json!({"timeout_ms": 600000}));
    }
}
