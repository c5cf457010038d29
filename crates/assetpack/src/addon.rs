//! Addon hook chain.
//!
//! Addons observe or replace the tree of a given asset kind before and after
//! the packager's own processing. Both hooks default to the identity, so an
//! addon implements only the ones it cares about.

use std::fmt;
use std::sync::Arc;

use assetpack_tree::Tree;

use crate::{Error, Result};

/// A participant in the packaging hook chain.
///
/// # Example
///
/// ```
/// use assetpack::{Addon, Tree};
///
/// struct Banner;
///
/// impl Addon for Banner {
///     fn name(&self) -> &str {
///         "banner"
///     }
///
///     fn postprocess_tree(&self, kind: &str, tree: Tree) -> anyhow::Result<Tree> {
///         Ok(if kind == "css" { tree.annotate("with banner") } else { tree })
///     }
/// }
/// ```
pub trait Addon: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Runs on the raw input tree, before registry preprocessing.
    fn preprocess_tree(&self, _kind: &str, tree: Tree) -> anyhow::Result<Tree> {
        Ok(tree)
    }

    /// Runs on the packaged tree, after minification.
    fn postprocess_tree(&self, _kind: &str, tree: Tree) -> anyhow::Result<Tree> {
        Ok(tree)
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Pre,
    Post,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::Pre => "preprocess_tree",
            Phase::Post => "postprocess_tree",
        }
    }
}

/// Ordered list of addons, folded left to right.
#[derive(Clone, Default)]
pub struct HookChain {
    addons: Vec<Arc<dyn Addon>>,
}

impl HookChain {
    pub fn new(addons: Vec<Arc<dyn Addon>>) -> Self {
        Self { addons }
    }

    pub fn push(&mut self, addon: Arc<dyn Addon>) {
        self.addons.push(addon);
    }

    /// Feed `tree` through every addon's `preprocess_tree`.
    pub fn preprocess(&self, kind: &str, tree: Tree) -> Result<Tree> {
        self.fold(Phase::Pre, kind, tree)
    }

    /// Feed `tree` through every addon's `postprocess_tree`.
    pub fn postprocess(&self, kind: &str, tree: Tree) -> Result<Tree> {
        self.fold(Phase::Post, kind, tree)
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    fn fold(&self, phase: Phase, kind: &str, tree: Tree) -> Result<Tree> {
        let mut tree = tree;
        for addon in &self.addons {
            tracing::debug!(addon = addon.name(), kind, hook = phase.as_str(), "running addon hook");
            let result = match phase {
                Phase::Pre => addon.preprocess_tree(kind, tree),
                Phase::Post => addon.postprocess_tree(kind, tree),
            };
            tree = result.map_err(|err| {
                tracing::error!(
                    addon = addon.name(),
                    kind,
                    hook = phase.as_str(),
                    "addon hook failed: {:#}",
                    err
                );
                Error::Addon(err)
            })?;
        }
        Ok(tree)
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.addons.iter().map(|addon| addon.name()))
            .finish()
    }
}
