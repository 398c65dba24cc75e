//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Default capacity of the subscriber's event buffer.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// How non-zero driver return codes are reported.
///
/// Several printer calls report failure through a return code instead of a
/// fault. `Normalize` keeps the terminal's historical behavior of folding the
/// code into a `false` success value; `Strict` surfaces it as a driver
/// failure carrying the code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnCodePolicy {
    #[default]
    Normalize,
    Strict,
}

/// Configuration for the bridge facade
///
/// # Example
///
/// ```
/// use tr150_bridge::{BridgeConfig, ReturnCodePolicy};
///
/// let config = BridgeConfig::default()
///     .with_return_code_policy(ReturnCodePolicy::Strict)
///     .with_event_buffer(16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Reporting of non-zero driver return codes
    pub return_code_policy: ReturnCodePolicy,

    /// Decode events buffered for a slow subscriber before new ones are dropped
    pub event_buffer: usize,

    /// Log decoded payloads at trace level (off: only lengths are logged)
    pub log_payloads: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            return_code_policy: ReturnCodePolicy::Normalize,
            event_buffer: DEFAULT_EVENT_BUFFER,
            log_payloads: false,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_return_code_policy(mut self, policy: ReturnCodePolicy) -> Self {
        self.return_code_policy = policy;
        self
    }

    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    pub fn with_log_payloads(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }

    /// Check the configuration for values the bridge cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.event_buffer == 0 {
            return Err(BridgeError::Config("event_buffer must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.return_code_policy, ReturnCodePolicy::Normalize);
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
        assert!(!config.log_payloads);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = BridgeConfig::default().with_event_buffer(0);
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let config = BridgeConfig::from_json(r#"{"return_code_policy":"strict"}"#).unwrap();
        assert_eq!(config.return_code_policy, ReturnCodePolicy::Strict);
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(BridgeConfig::from_json(r#"{"event_buffer":0}"#).is_err());
        assert!(BridgeConfig::from_json(r#"{"return_code_policy":"loose"}"#).is_err());
        assert!(BridgeConfig::from_json("not json").is_err());
    }
}
