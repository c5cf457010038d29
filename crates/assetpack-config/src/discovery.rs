//! File-based config discovery
//!
//! Finds and loads packager configuration from the filesystem. Library users
//! that already hold a config value should use `PackagerConfig::from_value()`.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Toml};
use figment::Figment;
use serde_json::Value;

use crate::config::PackagerConfig;
use crate::error::{ConfigError, Result};

/// Config file name searched for in the project root.
pub const CONFIG_FILE: &str = "assetpack.toml";

/// `package.json` field holding the configuration.
pub const PACKAGE_JSON_FIELD: &str = "assetpack";

/// Prefix of environment variables that override `name` and `env`.
pub const ENV_PREFIX: &str = "ASSETPACK_";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use assetpack_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. `assetpack.toml`
    /// 2. `package.json` with an `assetpack` field
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file
    ///
    /// `ASSETPACK_NAME` and `ASSETPACK_ENV` override the file's values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<PackagerConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<PackagerConfig> {
        let figment = if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            Figment::from(Json::file(path)).focus(PACKAGE_JSON_FIELD)
        } else {
            Figment::from(Toml::file(path))
        };

        let config: PackagerConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).only(&["name", "env"]))
            .extract()?;

        tracing::debug!(path = %path.display(), name = %config.name, env = %config.env, "loaded packager config");
        Ok(config)
    }
}

/// Discover and load config from the current directory
///
/// # Example
///
/// ```no_run
/// use assetpack_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<PackagerConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn find_skips_package_json_without_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "x" }"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn load_returns_not_found_when_no_config() {
        let dir = TempDir::new().unwrap();
        let result = ConfigDiscovery::new(dir.path()).load();
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound));
    }
}
