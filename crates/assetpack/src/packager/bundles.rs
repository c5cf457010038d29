//! Vendor bundles: ordered, deduplicated concatenations declared in config.

use assetpack_config::BundleOutputFiles;
use assetpack_tree::{normalize_path, ConcatOptions, FileMatch, MergeOptions, Tree};

/// Addon-compiled sources that always land in the main vendor bundle.
const ADDON_TREE_OUTPUT: &str = "addon-tree-output";

/// One concat per declared bundle, merged into a single tree.
///
/// The main vendor bundle (`vendor_path`) also picks up `ext` files from
/// `addon-tree-output`, after the declared files, and is emitted even when no
/// bundle declares it. Missing declared files fail the build, not this call.
pub(super) fn vendor_tree(
    label: &str,
    tree: &Tree,
    bundles: &BundleOutputFiles,
    vendor_path: &str,
    ext: &str,
) -> Tree {
    let vendor_key = normalize_path(vendor_path);
    let mut concats = Vec::with_capacity(bundles.len() + 1);
    let mut saw_vendor = false;

    for (output, files) in bundles {
        let is_main = normalize_path(output) == vendor_key;
        saw_vendor |= is_main;
        concats.push(bundle(label, tree, output, files, is_main, ext));
    }

    if !saw_vendor {
        concats.push(bundle(label, tree, vendor_path, &[], true, ext));
    }

    tracing::debug!(bundles = concats.len(), label, "composed vendor bundles");
    Tree::merge(concats, MergeOptions::overwrite()).annotate(format!("TreeMerger (vendor{})", label))
}

fn bundle(
    label: &str,
    tree: &Tree,
    output: &str,
    files: &[String],
    is_main: bool,
    ext: &str,
) -> Tree {
    let mut options = ConcatOptions::new(output).header_files(files);
    if is_main {
        options = options.input_files(FileMatch::new(ADDON_TREE_OUTPUT).extension(ext));
    }
    Tree::concat(tree.clone(), options).annotate(format!("Concat: Vendor {}{}", label, output))
}
