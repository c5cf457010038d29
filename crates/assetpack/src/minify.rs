//! Minifier seam.

use assetpack_config::MinifyConfig;
use assetpack_tree::Tree;
use serde_json::Value;

use crate::{Error, Result};

/// Compacts every file of a tree it understands.
///
/// `options` is the `options` blob from the packager's minify config, passed
/// through untouched. Like every tree operation, minifying only describes the
/// work; it happens when the tree is built.
pub trait Minifier: Send + Sync {
    fn name(&self) -> &str;

    fn minify(&self, tree: Tree, options: &Value) -> anyhow::Result<Tree>;
}

/// Minify `tree` when `config` enables it, otherwise return it untouched.
pub(crate) fn minify_if_enabled(
    minifier: Option<&dyn Minifier>,
    config: &MinifyConfig,
    kind: &str,
    tree: Tree,
) -> Result<Tree> {
    if !config.enabled {
        return Ok(tree);
    }

    let Some(minifier) = minifier else {
        return Err(Error::InvalidConfig(format!(
            "minification is enabled for {} but no minifier is attached",
            kind
        )));
    };

    tracing::debug!(minifier = minifier.name(), kind, "minifying tree");
    minifier.minify(tree, &config.options).map_err(|err| {
        tracing::error!(minifier = minifier.name(), kind, "minifier failed: {:#}", err);
        Error::Minifier(err)
    })
}
