//! Registry-driven preprocessing.

use assetpack_config::OutputPaths;
use assetpack_tree::{normalize_path, ConcatOptions, FileMatch, FunnelOptions, Tree};

use crate::registry::{PreprocessOptions, Registry};
use crate::{Error, Result};

/// Run `kind`'s registered preprocessors over `tree`, each consuming the
/// previous one's output. Returns `None` when nothing is registered, so the
/// caller can apply its default.
pub(super) fn run_registered(
    kind: &str,
    tree: Tree,
    input_path: &str,
    output_path: &str,
    options: &PreprocessOptions<'_>,
) -> Result<Option<Tree>> {
    let preprocessors = options.registry.load(kind);
    if preprocessors.is_empty() {
        return Ok(None);
    }

    let mut tree = tree;
    for preprocessor in preprocessors {
        tracing::debug!(
            kind,
            preprocessor = preprocessor.name(),
            input_path,
            output_path,
            "running preprocessor"
        );
        tree = preprocessor
            .to_tree(tree, input_path, output_path, options)
            .map_err(|err| {
                tracing::error!(
                    kind,
                    preprocessor = preprocessor.name(),
                    "preprocessor failed: {:#}",
                    err
                );
                Error::Preprocessor(err)
            })?;
    }
    Ok(Some(tree))
}

/// Default style preprocessing.
///
/// Takes the `kind` files under `input_path`. A file whose relative path,
/// minus its extension, names an output entry (`app.css` for entry `app`) is
/// moved to that entry's path; every other file, `themes/app.css` included,
/// lands under `output_path` at its relative path.
pub(super) fn default_styles(
    kind: &str,
    tree: Tree,
    input_path: &str,
    output_path: &str,
    output_paths: &OutputPaths,
    registry: &Registry,
) -> Tree {
    let entries: Vec<(String, String)> = output_paths
        .entries()
        .into_iter()
        .map(|(entry, path)| (entry.to_string(), normalize_path(path)))
        .collect();
    let output_path = normalize_path(output_path);

    let mut options = FunnelOptions::new()
        .src_dir(input_path)
        .allow_empty(true)
        .destination(move |relative| {
            let entry_name = strip_extension(relative);
            if let Some((_, path)) = entries.iter().find(|(entry, _)| entry == entry_name) {
                return Some(path.clone());
            }
            Some(join(&output_path, relative))
        });
    for ext in registry.extensions_for(kind) {
        options = options.include_extension(ext);
    }

    Tree::funnel(tree, options).annotate("Funnel (styles)")
}

/// Default script preprocessing: every `kind` file under `input_path`, in
/// sorted path order, concatenated into the primary app script path.
pub(super) fn default_scripts(
    kind: &str,
    tree: Tree,
    input_path: &str,
    output_paths: &OutputPaths,
    registry: &Registry,
) -> Result<Tree> {
    let output_file = output_paths.primary().ok_or_else(|| {
        Error::InvalidConfig("distPaths.appJsFile has no output path".to_string())
    })?;

    let mut matcher = FileMatch::new(input_path);
    for ext in registry.extensions_for(kind) {
        matcher = matcher.extension(ext);
    }

    Ok(
        Tree::concat(tree, ConcatOptions::new(output_file).input_files(matcher))
            .annotate("Concat: App"),
    )
}

/// Relative path without the file name's extension.
fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |slash| slash + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..name_start + dot],
    }
}

fn join(dir: &str, path: &str) -> String {
    if dir.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", dir, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_extension_keeps_directories() {
        assert_eq!(strip_extension("app.css"), "app");
        assert_eq!(strip_extension("themes/app.css"), "themes/app");
        assert_eq!(strip_extension("themes/dark.min.css"), "themes/dark.min");
        assert_eq!(strip_extension("themes.v2/README"), "themes.v2/README");
        assert_eq!(strip_extension("a/.hidden"), "a/.hidden");
    }

    #[test]
    fn join_skips_empty_dir() {
        assert_eq!(join("", "a.css"), "a.css");
        assert_eq!(join("assets", "a.css"), "assets/a.css");
    }
}
