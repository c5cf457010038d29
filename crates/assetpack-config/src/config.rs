//! Packager configuration.
//!
//! This module provides the serializable half of a packager's configuration.
//! The live half (preprocessor registry, addons, minifiers) is attached when
//! the packager is built. For file discovery, see the `discovery` module.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::helpers::default_env;
use crate::minify::MinifyConfig;
use crate::paths::{DistPaths, DistPathsConfig, OutputPaths};

/// Bundle output path -> ordered source files to concatenate into it.
pub type BundleOutputFiles = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagerConfig {
    /// Application identifier. Locates `<name>/styles` and names default outputs.
    pub name: String,

    /// Build environment tag, e.g. `development` or `production`.
    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default)]
    pub dist_paths: DistPathsConfig,

    #[serde(default, alias = "minifyCSS")]
    pub minify_css: MinifyConfig,

    #[serde(default, alias = "minifyJS")]
    pub minify_js: MinifyConfig,

    /// Vendor style bundles. Order within each list is the output order.
    #[serde(default)]
    pub style_output_files: BundleOutputFiles,

    /// Vendor script bundles. Order within each list is the output order.
    #[serde(default)]
    pub script_output_files: BundleOutputFiles,
}

impl PackagerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env: default_env(),
            dist_paths: DistPathsConfig::default(),
            minify_css: MinifyConfig::default(),
            minify_js: MinifyConfig::default(),
            style_output_files: IndexMap::new(),
            script_output_files: IndexMap::new(),
        }
    }

    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use assetpack_config::PackagerConfig;
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "name": "the-best-app-ever",
    ///     "distPaths": {
    ///         "appCssFile": { "app": "/assets/the-best-app-ever.css" },
    ///         "vendorCssFile": "/assets/vendor.css"
    ///     },
    ///     "minifyCSS": { "enabled": false },
    ///     "styleOutputFiles": {
    ///         "/assets/vendor.css": ["vendor/normalize.css"]
    ///     }
    /// });
    ///
    /// let config = PackagerConfig::from_value(value).unwrap();
    /// assert_eq!(config.env, "development");
    /// assert_eq!(config.style_output_files["/assets/vendor.css"].len(), 1);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Render as `assetpack.toml` contents.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Output paths with defaults filled in from `name`.
    pub fn dist_paths(&self) -> DistPaths {
        self.dist_paths.resolve(&self.name)
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = env.into();
        self
    }

    pub fn with_app_css_file(mut self, paths: impl Into<OutputPaths>) -> Self {
        self.dist_paths.app_css_file = Some(paths.into());
        self
    }

    pub fn with_vendor_css_file(mut self, path: impl Into<String>) -> Self {
        self.dist_paths.vendor_css_file = Some(path.into());
        self
    }

    pub fn with_app_js_file(mut self, paths: impl Into<OutputPaths>) -> Self {
        self.dist_paths.app_js_file = Some(paths.into());
        self
    }

    pub fn with_vendor_js_file(mut self, path: impl Into<String>) -> Self {
        self.dist_paths.vendor_js_file = Some(path.into());
        self
    }

    pub fn with_minify_css(mut self, minify: MinifyConfig) -> Self {
        self.minify_css = minify;
        self
    }

    pub fn with_minify_js(mut self, minify: MinifyConfig) -> Self {
        self.minify_js = minify;
        self
    }

    /// Declare (or replace) a vendor style bundle.
    pub fn with_style_bundle(
        mut self,
        output: impl Into<String>,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.style_output_files
            .insert(output.into(), files.into_iter().map(Into::into).collect());
        self
    }

    /// Declare (or replace) a vendor script bundle.
    pub fn with_script_bundle(
        mut self,
        output: impl Into<String>,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.script_output_files
            .insert(output.into(), files.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
