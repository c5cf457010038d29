//! CSS minification options

use serde::Deserialize;
use serde_json::Value;

/// Options for [`CssMinifier`](super::CssMinifier), read from the packager's
/// `minifyCSS.options` blob.
///
/// Unknown keys are ignored; they may belong to another minifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssMinifyOptions {
    /// Base directory reported in parse errors.
    pub relative_to: Option<String>,

    /// Inline `@import`ed files.
    ///
    /// Minification works on already-packaged bundles, so imports are left
    /// as they are; setting this only produces a warning.
    pub process_import: bool,

    /// Skip files whose path contains any of these substrings.
    pub exclude: Vec<String>,
}

impl Default for CssMinifyOptions {
    fn default() -> Self {
        Self {
            relative_to: None,
            process_import: false,
            exclude: vec![".min.css".to_string()],
        }
    }
}

impl CssMinifyOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a minify config blob. `null` means defaults.
    pub fn from_value(value: &Value) -> anyhow::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("Invalid CSS minify options: {}", e))
    }

    pub fn with_relative_to(mut self, dir: impl Into<String>) -> Self {
        self.relative_to = Some(dir.into());
        self
    }

    /// Add exclusion pattern
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    pub(crate) fn is_excluded(&self, path: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| path.contains(pattern.as_str()))
    }
}
