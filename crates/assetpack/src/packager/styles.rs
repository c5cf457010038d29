use assetpack_tree::{MergeOptions, Tree};

use super::{ASSETS_DIR, DefaultPackager, PACKAGED_STYLES, bundles, label, preprocess};
use crate::minify::minify_if_enabled;
use crate::registry::PreprocessOptions;
use crate::{CSS, Result};

/// hooks → registry (or default funnel) → vendor bundles → minify → hooks
pub(super) fn package(packager: &DefaultPackager, tree: Tree) -> Result<Tree> {
    let config = &packager.config;
    let dist = &packager.dist_paths;
    tracing::info!(name = %config.name, env = %config.env, "packaging styles");

    let styles_and_vendor = packager.hooks.preprocess(CSS, tree)?;

    let options = PreprocessOptions {
        output_paths: &dist.app_css_file,
        minify: &config.minify_css,
        registry: &packager.registry,
    };
    let input_path = format!("{}/styles", config.name);
    let app = match preprocess::run_registered(
        CSS,
        styles_and_vendor.clone(),
        &input_path,
        ASSETS_DIR,
        &options,
    )? {
        Some(tree) => tree,
        None => preprocess::default_styles(
            CSS,
            styles_and_vendor.clone(),
            &input_path,
            ASSETS_DIR,
            &dist.app_css_file,
            &packager.registry,
        ),
    };

    let vendor = bundles::vendor_tree(
        "Styles",
        &styles_and_vendor,
        &config.style_output_files,
        &dist.vendor_css_file,
        CSS,
    );

    let minifier = Some(&*packager.style_minifier);
    let app = minify_if_enabled(minifier, &config.minify_css, CSS, app)?;
    let vendor = minify_if_enabled(minifier, &config.minify_css, CSS, vendor)?;

    let packaged = Tree::merge([app, vendor], MergeOptions::overwrite()).annotate(PACKAGED_STYLES);
    let packaged = packager.hooks.postprocess(CSS, packaged)?;
    Ok(label(packaged, PACKAGED_STYLES))
}
