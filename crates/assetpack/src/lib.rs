#![cfg_attr(docsrs, feature(doc_cfg))]

//! # assetpack
//!
//! Packages an application's styles and scripts into a fixed set of output
//! bundles.
//!
//! A [`DefaultPackager`] takes the merged input tree of a build (application
//! sources, addon output, vendor and bower assets) and describes the packaged
//! output:
//!
//! ```text
//! input tree → addon preprocess hooks → registry preprocessors
//!            → vendor bundles (ordered, deduplicated) → minify
//!            → addon postprocess hooks → cached result
//! ```
//!
//! Packaging only composes [`Tree`] descriptors. Nothing is read or written
//! until a [`TreeBuilder`] builds the result.
//!
//! ## Quick Start
//!
//! ```no_run
//! use assetpack::{DefaultPackager, PackagerConfig, Tree, TreeBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackagerConfig::new("the-best-app-ever")
//!     .with_style_bundle("/assets/vendor.css", ["vendor/normalize.css"]);
//!
//! let packager = DefaultPackager::builder(config).build()?;
//! let styles = packager.package_styles(Tree::source("."))?;
//!
//! let snapshot = TreeBuilder::native(".").build(&styles).await?;
//! snapshot.write_to("dist", true)?;
//! # Ok(()) }
//! ```

pub mod addon;
pub mod builtins;
pub mod minify;
pub mod packager;
pub mod registry;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use addon::{Addon, HookChain};
pub use builtins::{CssMinifier, CssMinifyOptions};
pub use minify::Minifier;
pub use packager::{DefaultPackager, DefaultPackagerBuilder, PACKAGED_SCRIPTS, PACKAGED_STYLES};
pub use registry::{PreprocessOptions, Preprocessor, Registry, preprocessor};

// Re-export the foundation crates' main types
pub use assetpack_config::{
    ConfigError, DistPaths, MinifyConfig, OutputPaths, PackagerConfig,
};
pub use assetpack_tree::{
    ConcatOptions, FileMatch, Filter, FunnelOptions, MergeOptions, Snapshot, Tree, TreeBuilder,
    TreeError,
};

/// Asset kind tag for styles, as seen by addons and the registry.
pub const CSS: &str = "css";

/// Asset kind tag for scripts.
pub const JS: &str = "js";

/// Error types for packaging operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] assetpack_config::ConfigError),

    /// Tree construction or evaluation failed.
    #[error(transparent)]
    Tree(#[from] assetpack_tree::TreeError),

    /// An addon hook failed.
    #[error(transparent)]
    Addon(anyhow::Error),

    /// A registered preprocessor failed.
    #[error(transparent)]
    Preprocessor(anyhow::Error),

    /// A minifier failed.
    #[error(transparent)]
    Minifier(anyhow::Error),

    /// The live half of the configuration does not fit the serializable half.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;
