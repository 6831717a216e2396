//! Router configuration.
//!
//! # Example
//! ```rust,ignore
//! use routekit::{RouterConfig, Strategy};
//!
//! let config = RouterConfig::new()
//!     .with_strategy(Strategy::Linear)
//!     .with_uri_prefix("/api/v1");
//! config.validate()?;
//! ```

use crate::compiler::Strategy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for building a [`Router`](crate::Router).
///
/// # Fields
///
/// * `strategy` - How routes are compiled into a matcher. Default: `tree_pattern`.
///
/// * `uri_prefix` - Prepended to every generated URI, e.g. a mount point.
///   Default: empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Matching strategy (default: TreePattern)
    pub strategy: Strategy,
    /// Prefix for generated URIs (default: "")
    pub uri_prefix: String,
}

impl RouterConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUriPrefix`] unless the prefix is empty or
    /// starts with `/` and does not end with `/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.uri_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(ConfigError::InvalidUriPrefix {
                prefix: prefix.clone(),
            });
        }
        Ok(())
    }

    /// Set the matching strategy.
    #[must_use = "This method returns a new RouterConfig and does not modify self"]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the prefix for generated URIs.
    #[must_use = "This method returns a new RouterConfig and does not modify self"]
    pub fn with_uri_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.uri_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.strategy, Strategy::TreePattern);
        assert!(config.uri_prefix.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = RouterConfig::new()
            .with_strategy(Strategy::Tree)
            .with_uri_prefix("/api");
        assert_eq!(config.strategy, Strategy::Tree);
        assert_eq!(config.uri_prefix, "/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prefix_validation() {
        for bad in ["api", "/api/", "/"] {
            let config = RouterConfig::new().with_uri_prefix(bad);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidUriPrefix { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_partial() {
        let config: RouterConfig = serde_json::from_str(r#"{"strategy":"linear"}"#).unwrap();
        assert_eq!(config.strategy, Strategy::Linear);
        assert_eq!(config.uri_prefix, "");
    }
}
