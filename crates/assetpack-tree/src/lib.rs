//! # assetpack-tree
//!
//! Lazy file tree descriptors and the builder that evaluates them.
//!
//! A [`Tree`] describes a directory without reading it: a source directory on
//! disk, an in-memory fixture, or a composition of other trees (funnel, merge,
//! concat, filter). Nothing touches the filesystem until a [`TreeBuilder`]
//! evaluates the descriptor into a [`Snapshot`].
//!
//! ```no_run
//! use assetpack_tree::{ConcatOptions, Tree, TreeBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> assetpack_tree::Result<()> {
//! let vendor = Tree::concat(
//!     Tree::source("./bower_components"),
//!     ConcatOptions::new("assets/vendor.css").header_files(["a.css", "b.css"]),
//! );
//!
//! let snapshot = TreeBuilder::native(".").build(&vendor).await?;
//! snapshot.write_to("dist", true)?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod path;
pub mod runtime;
pub mod snapshot;
mod tree;
pub mod writer;

pub use builder::TreeBuilder;
pub use error::{Result, TreeError};
pub use path::normalize_path;
pub use runtime::{FileMetadata, MemoryRuntime, NativeRuntime, Runtime, RuntimeError, RuntimeResult};
pub use snapshot::Snapshot;
pub use tree::{
    ConcatOptions, DestinationFn, FileMatch, Filter, FunnelOptions, MergeOptions, Tree, TreeKind,
};
