//! Preprocessor registry.
//!
//! Maps an asset kind (`"css"`, `"js"`) to the ordered list of preprocessors
//! that turn raw sources of that kind into packaged files. An empty list is
//! valid: the packager then falls back to its default preprocessing.

use std::fmt;
use std::sync::Arc;

use assetpack_config::{MinifyConfig, OutputPaths};
use assetpack_tree::Tree;
use rustc_hash::FxHashMap;

/// Context handed to every preprocessor.
pub struct PreprocessOptions<'a> {
    /// Output paths of the bundle set being packaged, e.g. `distPaths.appCssFile`.
    pub output_paths: &'a OutputPaths,
    /// Minification settings for the asset kind.
    pub minify: &'a MinifyConfig,
    pub registry: &'a Registry,
}

/// A registered transform for one asset kind.
pub trait Preprocessor: Send + Sync {
    fn name(&self) -> &str;

    /// Transform `tree`.
    ///
    /// `input_path` is where the kind's sources live inside `tree` (for styles,
    /// `<name>/styles`); `output_path` is where packaged files belong
    /// (`assets`). A preprocessor may rename, drop, or rewrite files.
    fn to_tree(
        &self,
        tree: Tree,
        input_path: &str,
        output_path: &str,
        options: &PreprocessOptions<'_>,
    ) -> anyhow::Result<Tree>;
}

type PreprocessFn =
    dyn Fn(Tree, &str, &str, &PreprocessOptions<'_>) -> anyhow::Result<Tree> + Send + Sync;

struct FnPreprocessor {
    name: String,
    func: Box<PreprocessFn>,
}

impl Preprocessor for FnPreprocessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn to_tree(
        &self,
        tree: Tree,
        input_path: &str,
        output_path: &str,
        options: &PreprocessOptions<'_>,
    ) -> anyhow::Result<Tree> {
        (self.func)(tree, input_path, output_path, options)
    }
}

/// Wrap a closure as a [`Preprocessor`].
///
/// ```
/// use assetpack::{FunnelOptions, Registry, Tree, preprocessor};
///
/// let mut registry = Registry::new();
/// registry.add(
///     "css",
///     preprocessor("scss-rename", |tree, input, output, _options| {
///         Ok(Tree::funnel(
///             tree,
///             FunnelOptions::new()
///                 .src_dir(input)
///                 .dest_dir(output)
///                 .destination(|path| Some(path.replace(".scss", ".css"))),
///         ))
///     }),
/// );
/// assert_eq!(registry.load("css").len(), 1);
/// ```
pub fn preprocessor<F>(name: impl Into<String>, func: F) -> Arc<dyn Preprocessor>
where
    F: Fn(Tree, &str, &str, &PreprocessOptions<'_>) -> anyhow::Result<Tree>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnPreprocessor {
        name: name.into(),
        func: Box::new(func),
    })
}

/// Asset kind -> ordered preprocessors.
#[derive(Clone)]
pub struct Registry {
    preprocessors: FxHashMap<String, Vec<Arc<dyn Preprocessor>>>,
    extensions: FxHashMap<String, Vec<String>>,
}

impl Registry {
    /// Create a registry with no preprocessors and the default extensions
    /// (`css -> [css]`, `js -> [js]`).
    pub fn new() -> Self {
        let mut extensions = FxHashMap::default();
        extensions.insert(crate::CSS.to_string(), vec!["css".to_string()]);
        extensions.insert(crate::JS.to_string(), vec!["js".to_string()]);
        Self {
            preprocessors: FxHashMap::default(),
            extensions,
        }
    }

    /// Append a preprocessor to `kind`'s list.
    pub fn add(&mut self, kind: impl Into<String>, preprocessor: Arc<dyn Preprocessor>) {
        let kind = kind.into();
        tracing::debug!(kind = %kind, preprocessor = preprocessor.name(), "registered preprocessor");
        self.preprocessors.entry(kind).or_default().push(preprocessor);
    }

    /// Builder-style [`Registry::add`].
    pub fn with(mut self, kind: impl Into<String>, preprocessor: Arc<dyn Preprocessor>) -> Self {
        self.add(kind, preprocessor);
        self
    }

    /// Preprocessors registered for `kind`, in registration order.
    pub fn load(&self, kind: &str) -> Vec<Arc<dyn Preprocessor>> {
        self.preprocessors.get(kind).cloned().unwrap_or_default()
    }

    /// Remove every preprocessor called `name` from `kind`'s list.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, kind: &str, name: &str) -> bool {
        let Some(list) = self.preprocessors.get_mut(kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|preprocessor| preprocessor.name() != name);
        let removed = list.len() != before;
        if list.is_empty() {
            self.preprocessors.remove(kind);
        }
        removed
    }

    /// Whether any preprocessor is registered for `kind`.
    pub fn has(&self, kind: &str) -> bool {
        self.preprocessors
            .get(kind)
            .is_some_and(|list| !list.is_empty())
    }

    /// Source extensions (no dot) handled by `kind`.
    pub fn extensions_for(&self, kind: &str) -> &[String] {
        self.extensions.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Teach `kind` another source extension, e.g. `scss` for `css`.
    pub fn add_extension(&mut self, kind: impl Into<String>, ext: impl AsRef<str>) {
        let ext = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
        let list = self.extensions.entry(kind.into()).or_default();
        if !list.contains(&ext) {
            list.push(ext);
        }
    }

    /// Total number of registered preprocessors.
    pub fn len(&self) -> usize {
        self.preprocessors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, list) in &self.preprocessors {
            let names: Vec<&str> = list.iter().map(|p| p.name()).collect();
            map.entry(kind, &names);
        }
        map.finish()
    }
}
