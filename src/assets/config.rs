// Loader configuration

use serde::{Deserialize, Serialize};

/// Behaviour switches for a dependency loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Reject manifests containing dependency cycles at start
    pub detect_cycles: bool,

    /// Return errors for callbacks that break the media starter contract
    /// (double completion, unknown ids). When off they are logged and ignored.
    pub strict_callbacks: bool,

    /// Treat a required group with no members as a configuration error.
    /// When off it is only logged; its dependents never load.
    pub require_group_members: bool,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_detect_cycles(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn with_strict_callbacks(mut self, enabled: bool) -> Self {
        self.strict_callbacks = enabled;
        self
    }

    pub fn with_require_group_members(mut self, enabled: bool) -> Self {
        self.require_group_members = enabled;
        self
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, super::LoaderError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            strict_callbacks: true,
            require_group_members: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict() {
        let config = LoaderConfig::default();
        assert!(config.detect_cycles);
        assert!(config.strict_callbacks);
        assert!(config.require_group_members);
    }

    #[test]
    fn test_builder_setters() {
        let config = LoaderConfig::new()
            .with_detect_cycles(false)
            .with_strict_callbacks(false);

        assert!(!config.detect_cycles);
        assert!(!config.strict_callbacks);
        assert!(config.require_group_members);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LoaderConfig::from_json_str(r#"{ "strictCallbacks": false }"#).unwrap();
        assert!(!config.strict_callbacks);
        assert!(config.detect_cycles);
    }
}
