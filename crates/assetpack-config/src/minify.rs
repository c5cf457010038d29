use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helpers::default_minify_options;

/// Minification switch plus the options handed to the minifier untouched.
///
/// The packager never interprets `options`; keys such as `relativeTo` or
/// `processImport` only mean something to the minifier that receives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinifyConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_minify_options")]
    pub options: Value,
}

impl MinifyConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(Value::as_bool)
    }
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            options: default_minify_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_default_to_empty_object() {
        let config: MinifyConfig = serde_json::from_value(json!({ "enabled": true })).unwrap();
        assert!(config.enabled);
        assert_eq!(config.options, json!({}));
    }

    #[test]
    fn option_accessors() {
        let config = MinifyConfig::enabled()
            .with_options(json!({ "processImport": false, "relativeTo": "assets" }));
        assert_eq!(config.option_str("relativeTo"), Some("assets"));
        assert_eq!(config.option_bool("processImport"), Some(false));
        assert_eq!(config.option_bool("relativeTo"), None);
    }
}
