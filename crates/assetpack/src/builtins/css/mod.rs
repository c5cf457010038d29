//! Built-in CSS minification
//!
//! [`CssMinifier`] compacts every `.css` file of a tree with lightningcss:
//! parse, merge rules and shorthands, then print without whitespace.
//!
//! ## Example Usage
//!
//! ```rust
//! use assetpack::{CssMinifier, Minifier, Tree};
//! use serde_json::json;
//!
//! let minifier = CssMinifier::new();
//! let tree = Tree::from_files([("assets/app.css", "html { height: 100%; }")]);
//! let minified = minifier.minify(tree, &json!({ "relativeTo": "assets" })).unwrap();
//! assert_eq!(minified.kind_name(), "filter");
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use assetpack_tree::{Filter, Tree};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
};
use serde_json::Value;

use crate::minify::Minifier;

mod config;
pub use config::CssMinifyOptions;

/// lightningcss-backed [`Minifier`] for style trees.
#[derive(Debug, Clone, Default)]
pub struct CssMinifier;

impl CssMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Minifier for CssMinifier {
    fn name(&self) -> &str {
        "lightningcss"
    }

    fn minify(&self, tree: Tree, options: &Value) -> anyhow::Result<Tree> {
        let options = CssMinifyOptions::from_value(options)?;
        if options.process_import {
            tracing::warn!("processImport is not supported when minifying packaged CSS; imports are kept as written");
        }
        Ok(Tree::filter(tree, Arc::new(CssMinifyFilter { options })).annotate("CSS Minify"))
    }
}

/// Per-file half of [`CssMinifier`].
struct CssMinifyFilter {
    options: CssMinifyOptions,
}

impl CssMinifyFilter {
    fn minify_css(&self, path: &str, source: &str) -> anyhow::Result<String> {
        let filename = match &self.options.relative_to {
            Some(base) => Path::new(base).join(path).to_string_lossy().into_owned(),
            None => path.to_string(),
        };

        let mut stylesheet = StyleSheet::parse(
            source,
            ParserOptions {
                filename: filename.clone(),
                ..Default::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to parse CSS from {}: {}", filename, e))?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to minify CSS from {}: {}", filename, e))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("Failed to print CSS from {}: {}", filename, e))?;

        Ok(result.code)
    }
}

impl Filter for CssMinifyFilter {
    fn name(&self) -> &str {
        "css-minify"
    }

    fn can_process(&self, relative_path: &str) -> bool {
        relative_path.to_ascii_lowercase().ends_with(".css")
            && !self.options.is_excluded(relative_path)
    }

    fn process(&self, relative_path: &str, contents: &[u8]) -> anyhow::Result<Vec<u8>> {
        let source = std::str::from_utf8(contents)
            .with_context(|| format!("CSS file {} contains invalid UTF-8", relative_path))?;

        if source.trim().is_empty() {
            return Ok(contents.to_vec());
        }

        let minified = self.minify_css(relative_path, source)?;
        tracing::debug!(
            path = relative_path,
            before = contents.len(),
            after = minified.len(),
            "minified css"
        );
        Ok(minified.into_bytes())
    }
}
