//! Output path configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::helpers::default_assets_dir;

/// Where an application bundle is written.
///
/// Most apps have one entry and configure a plain path. Apps with several
/// entry bundles map each entry name to its own path.
///
/// ```
/// use assetpack_config::OutputPaths;
/// use serde_json::json;
///
/// let single: OutputPaths = serde_json::from_value(json!("/assets/app.css")).unwrap();
/// assert_eq!(single.get("app"), Some("/assets/app.css"));
///
/// let named: OutputPaths =
///     serde_json::from_value(json!({ "app": "/assets/app.css", "admin": "/assets/admin.css" }))
///         .unwrap();
/// assert_eq!(named.get("admin"), Some("/assets/admin.css"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputPaths {
    Single(String),
    Named(IndexMap<String, String>),
}

impl OutputPaths {
    /// Entry name a [`OutputPaths::Single`] path answers to.
    pub const DEFAULT_ENTRY: &'static str = "app";

    pub fn single(path: impl Into<String>) -> Self {
        OutputPaths::Single(path.into())
    }

    pub fn named<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        OutputPaths::Named(
            entries
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        )
    }

    /// Output path for the entry called `entry`.
    pub fn get(&self, entry: &str) -> Option<&str> {
        match self {
            OutputPaths::Single(path) => (entry == Self::DEFAULT_ENTRY).then_some(path.as_str()),
            OutputPaths::Named(paths) => paths.get(entry).map(String::as_str),
        }
    }

    /// Path of the default entry, or the first named one.
    pub fn primary(&self) -> Option<&str> {
        match self {
            OutputPaths::Single(path) => Some(path.as_str()),
            OutputPaths::Named(paths) => paths
                .get(Self::DEFAULT_ENTRY)
                .or_else(|| paths.values().next())
                .map(String::as_str),
        }
    }

    /// `(entry, path)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            OutputPaths::Single(path) => vec![(Self::DEFAULT_ENTRY, path.as_str())],
            OutputPaths::Named(paths) => paths
                .iter()
                .map(|(name, path)| (name.as_str(), path.as_str()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            OutputPaths::Single(path) => path.is_empty(),
            OutputPaths::Named(paths) => paths.is_empty(),
        }
    }
}

impl From<&str> for OutputPaths {
    fn from(path: &str) -> Self {
        OutputPaths::Single(path.to_string())
    }
}

impl From<String> for OutputPaths {
    fn from(path: String) -> Self {
        OutputPaths::Single(path)
    }
}

/// `distPaths` as written in configuration; anything left out gets a
/// default derived from the application name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistPathsConfig {
    #[serde(default, alias = "appStyleFile", skip_serializing_if = "Option::is_none")]
    pub app_css_file: Option<OutputPaths>,

    #[serde(default, alias = "vendorStyleFile", skip_serializing_if = "Option::is_none")]
    pub vendor_css_file: Option<String>,

    #[serde(default, alias = "appScriptFile", skip_serializing_if = "Option::is_none")]
    pub app_js_file: Option<OutputPaths>,

    #[serde(default, alias = "vendorScriptFile", skip_serializing_if = "Option::is_none")]
    pub vendor_js_file: Option<String>,
}

impl DistPathsConfig {
    /// Fill in defaults for `name`.
    pub fn resolve(&self, name: &str) -> DistPaths {
        let defaults = DistPaths::for_app(name);
        DistPaths {
            app_css_file: self.app_css_file.clone().unwrap_or(defaults.app_css_file),
            vendor_css_file: self
                .vendor_css_file
                .clone()
                .unwrap_or(defaults.vendor_css_file),
            app_js_file: self.app_js_file.clone().unwrap_or(defaults.app_js_file),
            vendor_js_file: self.vendor_js_file.clone().unwrap_or(defaults.vendor_js_file),
        }
    }
}

/// Fully resolved output paths for every bundle role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistPaths {
    pub app_css_file: OutputPaths,
    pub vendor_css_file: String,
    pub app_js_file: OutputPaths,
    pub vendor_js_file: String,
}

impl DistPaths {
    /// Conventional layout: `/assets/<name>.css`, `/assets/vendor.css`, and the `.js` twins.
    pub fn for_app(name: &str) -> Self {
        let assets = default_assets_dir();
        Self {
            app_css_file: OutputPaths::Single(format!("{}/{}.css", assets, name)),
            vendor_css_file: format!("{}/vendor.css", assets),
            app_js_file: OutputPaths::Single(format!("{}/{}.js", assets, name)),
            vendor_js_file: format!("{}/vendor.js", assets),
        }
    }
}
