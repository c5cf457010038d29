use assetpack_tree::{MergeOptions, Tree};

use super::{ASSETS_DIR, DefaultPackager, PACKAGED_SCRIPTS, bundles, label, preprocess};
use crate::minify::minify_if_enabled;
use crate::registry::PreprocessOptions;
use crate::{JS, Result};

/// Same shape as styles, keyed `"js"`, reading sources from `<name>/`.
pub(super) fn package(packager: &DefaultPackager, tree: Tree) -> Result<Tree> {
    let config = &packager.config;
    let dist = &packager.dist_paths;
    tracing::info!(name = %config.name, env = %config.env, "packaging scripts");

    let scripts_and_vendor = packager.hooks.preprocess(JS, tree)?;

    let options = PreprocessOptions {
        output_paths: &dist.app_js_file,
        minify: &config.minify_js,
        registry: &packager.registry,
    };
    let app = match preprocess::run_registered(
        JS,
        scripts_and_vendor.clone(),
        &config.name,
        ASSETS_DIR,
        &options,
    )? {
        Some(tree) => tree,
        None => preprocess::default_scripts(
            JS,
            scripts_and_vendor.clone(),
            &config.name,
            &dist.app_js_file,
            &packager.registry,
        )?,
    };

    let vendor = bundles::vendor_tree(
        "Scripts",
        &scripts_and_vendor,
        &config.script_output_files,
        &dist.vendor_js_file,
        JS,
    );

    let minifier = packager.script_minifier.as_deref();
    let app = minify_if_enabled(minifier, &config.minify_js, JS, app)?;
    let vendor = minify_if_enabled(minifier, &config.minify_js, JS, vendor)?;

    let packaged =
        Tree::merge([app, vendor], MergeOptions::overwrite()).annotate(PACKAGED_SCRIPTS);
    let packaged = packager.hooks.postprocess(JS, packaged)?;
    Ok(label(packaged, PACKAGED_SCRIPTS))
}
