//! Pluggable config validation strategies
//!
//! Validation is schema-only: it never touches the filesystem. Missing source
//! files are reported by the tree builder when the packaged tree is built.

use std::collections::HashMap;

use assetpack_tree::normalize_path;

use crate::config::{BundleOutputFiles, PackagerConfig};
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &PackagerConfig) -> Result<()>;
}

/// Schema validation: required fields, well-formed paths, and no two
/// outputs sharing a file.
///
/// # Example
///
/// ```
/// use assetpack_config::{ConfigValidator, PackagerConfig, SchemaValidator};
///
/// let config = PackagerConfig::new("my-app")
///     .with_style_bundle("/assets/vendor.css", ["vendor/reset.css"]);
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &PackagerConfig) -> Result<()> {
        if config.name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "application name cannot be empty".to_string(),
                hint: Some("Set 'name' to the application's identifier".to_string()),
            });
        }

        if config.env.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "environment cannot be empty".to_string(),
                hint: Some("Use e.g. 'development' or 'production'".to_string()),
            });
        }

        let dist = config.dist_paths();
        let mut claims = OutputClaims::default();

        for (entry, path) in dist.app_css_file.entries() {
            claims.claim(path, format!("distPaths.appCssFile.{}", entry))?;
        }
        claims.claim(&dist.vendor_css_file, "distPaths.vendorCssFile".to_string())?;
        for (entry, path) in dist.app_js_file.entries() {
            claims.claim(path, format!("distPaths.appJsFile.{}", entry))?;
        }
        claims.claim(&dist.vendor_js_file, "distPaths.vendorJsFile".to_string())?;

        validate_bundles(
            &config.style_output_files,
            "styleOutputFiles",
            &dist.vendor_css_file,
            &mut claims,
        )?;
        validate_bundles(
            &config.script_output_files,
            "scriptOutputFiles",
            &dist.vendor_js_file,
            &mut claims,
        )?;

        Ok(())
    }
}

/// Validate with [`SchemaValidator`].
pub fn validate_schema(config: &PackagerConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

fn validate_bundles(
    bundles: &BundleOutputFiles,
    field: &str,
    vendor_path: &str,
    claims: &mut OutputClaims,
) -> Result<()> {
    for (output, files) in bundles {
        // The vendor bundle is already claimed by its distPaths role.
        if normalize_path(output) != normalize_path(vendor_path) {
            claims.claim(output, format!("{}[{}]", field, output))?;
        }

        if files.iter().any(|file| normalize_path(file).is_empty()) {
            return Err(ConfigError::SchemaValidation {
                message: format!("{}[{}] lists an empty file path", field, output),
                hint: Some("Remove empty strings from the file list".to_string()),
            });
        }
    }
    Ok(())
}

/// Output path -> the role that first declared it.
#[derive(Default)]
struct OutputClaims {
    owners: HashMap<String, String>,
}

impl OutputClaims {
    fn claim(&mut self, path: &str, role: String) -> Result<()> {
        let key = normalize_path(path);
        if key.is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: format!("{} has an empty output path", role),
                hint: None,
            });
        }

        if let Some(first) = self.owners.get(&key) {
            return Err(ConfigError::ConflictingOutputPath {
                path: path.to_string(),
                first: first.clone(),
                second: role,
            });
        }

        self.owners.insert(key, role);
        Ok(())
    }
}
