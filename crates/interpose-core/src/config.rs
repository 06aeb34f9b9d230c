//! Factory configuration

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Limits applied when synthesizing a proxy for a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Maximum operations per contract
    pub max_operations: usize,
    /// Maximum parameters per operation
    pub max_arity: usize,
}

impl FactoryConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max operations
    #[inline]
    #[must_use]
    pub fn with_max_operations(mut self, max: usize) -> Self {
        self.max_operations = max;
        self
    }

    /// With max arity
    #[inline]
    #[must_use]
    pub fn with_max_arity(mut self, max: usize) -> Self {
        self.max_arity = max;
        self
    }

    /// Check limits are usable
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidConfig`] for a zero operation limit.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_operations == 0 {
            return Err(ConfigurationError::InvalidConfig(
                "max_operations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate configuration from TOML
    ///
    /// Missing keys fall back to defaults.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::InvalidConfig`] on parse or range errors.
    pub fn from_toml(source: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            toml::from_str(source).map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_operations: 256,
            max_arity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FactoryConfig::new();
        assert_eq!(config.max_operations, 256);
        assert_eq!(config.max_arity, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders() {
        let config = FactoryConfig::new().with_max_operations(2).with_max_arity(0);
        assert_eq!(config.max_operations, 2);
        assert_eq!(config.max_arity, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_operations_rejected() {
        let err = FactoryConfig::new().with_max_operations(0).validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidConfig(_)));
    }

    #[test]
    fn from_toml_partial() {
        let config = FactoryConfig::from_toml("max_arity = 4").unwrap();
        assert_eq!(config.max_arity, 4);
        assert_eq!(config.max_operations, 256);
    }

    #[test]
    fn from_toml_rejects_garbage() {
        assert!(FactoryConfig::from_toml("max_arity = \"four\"").is_err());
        assert!(FactoryConfig::from_toml("max_operations = 0").is_err());
    }
}
