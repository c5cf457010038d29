//! The default packager.
//!
//! One [`DefaultPackager`] is built per build. Its first `package_styles` /
//! `package_scripts` call composes the packaging tree and caches it; every
//! later call on the same instance returns the cached tree, whatever input
//! it is given. Build a new packager to package different inputs.

mod bundles;
mod preprocess;
mod scripts;
mod styles;

use std::sync::Arc;

use assetpack_config::{ConfigValidator, DistPaths, PackagerConfig, SchemaValidator};
use assetpack_tree::Tree;
use once_cell::sync::OnceCell;

use crate::addon::{Addon, HookChain};
use crate::builtins::CssMinifier;
use crate::minify::Minifier;
use crate::registry::Registry;
use crate::{Error, Result};

/// Directory packaged files are written under.
pub(crate) const ASSETS_DIR: &str = "assets";

/// Annotation of the cached styles tree.
pub const PACKAGED_STYLES: &str = "Packaged Styles";

/// Annotation of the cached scripts tree.
pub const PACKAGED_SCRIPTS: &str = "Packaged Javascript";

/// Packages styles and scripts for one build.
///
/// # Example
///
/// ```
/// use assetpack::{DefaultPackager, PackagerConfig, Tree};
///
/// let packager = DefaultPackager::builder(PackagerConfig::new("the-best-app-ever"))
///     .build()
///     .unwrap();
///
/// assert!(packager.cached_styles().is_none());
/// let first = packager.package_styles(Tree::empty()).unwrap();
/// let second = packager.package_styles(Tree::empty()).unwrap();
/// assert!(Tree::ptr_eq(&first, &second));
/// assert_eq!(first.annotation(), Some("Packaged Styles"));
/// ```
pub struct DefaultPackager {
    config: PackagerConfig,
    dist_paths: DistPaths,
    registry: Arc<Registry>,
    hooks: HookChain,
    style_minifier: Arc<dyn Minifier>,
    script_minifier: Option<Arc<dyn Minifier>>,
    styles: OnceCell<Tree>,
    scripts: OnceCell<Tree>,
}

impl DefaultPackager {
    pub fn builder(config: PackagerConfig) -> DefaultPackagerBuilder {
        DefaultPackagerBuilder::new(config)
    }

    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Output paths with defaults filled in.
    pub fn dist_paths(&self) -> &DistPaths {
        &self.dist_paths
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Package the styles of `tree`.
    ///
    /// Only the first call runs the pipeline. Failures leave the cache empty,
    /// so a later call retries.
    pub fn package_styles(&self, tree: Tree) -> Result<Tree> {
        if let Some(cached) = self.styles.get() {
            tracing::debug!(name = %self.config.name, "returning cached packaged styles");
            return Ok(cached.clone());
        }
        self.styles
            .get_or_try_init(|| styles::package(self, tree))
            .cloned()
    }

    /// Package the scripts of `tree`. Cached like [`package_styles`](Self::package_styles).
    pub fn package_scripts(&self, tree: Tree) -> Result<Tree> {
        if let Some(cached) = self.scripts.get() {
            tracing::debug!(name = %self.config.name, "returning cached packaged scripts");
            return Ok(cached.clone());
        }
        self.scripts
            .get_or_try_init(|| scripts::package(self, tree))
            .cloned()
    }

    /// The cached styles tree, if styles were packaged.
    pub fn cached_styles(&self) -> Option<&Tree> {
        self.styles.get()
    }

    /// The cached scripts tree, if scripts were packaged.
    pub fn cached_scripts(&self) -> Option<&Tree> {
        self.scripts.get()
    }
}

impl std::fmt::Debug for DefaultPackager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultPackager")
            .field("name", &self.config.name)
            .field("env", &self.config.env)
            .field("registry", &self.registry)
            .field("addons", &self.hooks)
            .field("styles_cached", &self.styles.get().is_some())
            .field("scripts_cached", &self.scripts.get().is_some())
            .finish()
    }
}

/// Attaches the live half of a packager's configuration.
pub struct DefaultPackagerBuilder {
    config: PackagerConfig,
    registry: Registry,
    hooks: HookChain,
    style_minifier: Arc<dyn Minifier>,
    script_minifier: Option<Arc<dyn Minifier>>,
}

impl DefaultPackagerBuilder {
    pub fn new(config: PackagerConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            hooks: HookChain::default(),
            style_minifier: Arc::new(CssMinifier::new()),
            script_minifier: None,
        }
    }

    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Append an addon to the hook chain.
    pub fn addon(mut self, addon: Arc<dyn Addon>) -> Self {
        self.hooks.push(addon);
        self
    }

    pub fn addons(mut self, addons: impl IntoIterator<Item = Arc<dyn Addon>>) -> Self {
        for addon in addons {
            self.hooks.push(addon);
        }
        self
    }

    /// Replace the built-in lightningcss minifier.
    pub fn style_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.style_minifier = minifier;
        self
    }

    pub fn script_minifier(mut self, minifier: Arc<dyn Minifier>) -> Self {
        self.script_minifier = Some(minifier);
        self
    }

    /// Validate the configuration and build the packager.
    ///
    /// # Errors
    ///
    /// - `ConfigError` if the configuration fails schema validation, e.g.
    ///   two outputs share a path.
    /// - `Error::InvalidConfig` if script minification is enabled without a
    ///   script minifier.
    pub fn build(self) -> Result<DefaultPackager> {
        SchemaValidator.validate(&self.config)?;

        if self.config.minify_js.enabled && self.script_minifier.is_none() {
            return Err(Error::InvalidConfig(
                "minifyJS is enabled but no script minifier is attached".to_string(),
            ));
        }

        let dist_paths = self.config.dist_paths();
        tracing::debug!(
            name = %self.config.name,
            env = %self.config.env,
            addons = self.hooks.len(),
            preprocessors = self.registry.len(),
            "created packager"
        );

        Ok(DefaultPackager {
            config: self.config,
            dist_paths,
            registry: Arc::new(self.registry),
            hooks: self.hooks,
            style_minifier: self.style_minifier,
            script_minifier: self.script_minifier,
            styles: OnceCell::new(),
            scripts: OnceCell::new(),
        })
    }
}

/// Attach `label` to the packaged tree unless an addon already left it there.
pub(crate) fn label(tree: Tree, label: &str) -> Tree {
    if tree.annotation() == Some(label) {
        tree
    } else {
        tree.annotate(label)
    }
}
