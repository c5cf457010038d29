use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::path::normalize_path;

/// Maps a funnel-relative path to its destination. `None` drops the file.
pub type DestinationFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Per-file content rewrite applied while a tree is built.
///
/// Filters run lazily: constructing [`Tree::filter`] does nothing, the
/// filter is only called by the builder for files it [accepts](Filter::can_process).
pub trait Filter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether this filter rewrites the file at `relative_path`.
    fn can_process(&self, relative_path: &str) -> bool;

    /// Rewrite a single file's contents.
    fn process(&self, relative_path: &str, contents: &[u8]) -> anyhow::Result<Vec<u8>>;
}

/// Lazy description of a directory.
///
/// Cloning is cheap and keeps identity: two clones are [`Tree::ptr_eq`].
/// [`Tree::annotate`] produces a *new* tree describing the same contents.
#[derive(Clone)]
pub struct Tree {
    node: Arc<Node>,
}

pub(crate) struct Node {
    pub(crate) kind: TreeKind,
    pub(crate) annotation: Option<String>,
}

/// The composition a [`Tree`] describes.
#[derive(Clone)]
pub enum TreeKind {
    /// A directory on disk, read through the builder's runtime.
    Source(PathBuf),
    /// Fixed in-memory files.
    Files(Arc<BTreeMap<String, Vec<u8>>>),
    Funnel { input: Tree, options: FunnelOptions },
    Merge { inputs: Vec<Tree>, options: MergeOptions },
    Concat { input: Tree, options: ConcatOptions },
    Filter { input: Tree, filter: Arc<dyn Filter> },
}

impl Tree {
    fn from_kind(kind: TreeKind) -> Self {
        Self {
            node: Arc::new(Node {
                kind,
                annotation: None,
            }),
        }
    }

    /// A directory on disk.
    pub fn source(root: impl Into<PathBuf>) -> Self {
        Self::from_kind(TreeKind::Source(root.into()))
    }

    /// An in-memory tree. Paths are normalized to tree-relative form.
    ///
    /// ```
    /// use assetpack_tree::Tree;
    ///
    /// let tree = Tree::from_files([("/styles/app.css", "html {}")]);
    /// assert_eq!(tree.kind_name(), "files");
    /// ```
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        let files = files
            .into_iter()
            .map(|(path, contents)| (normalize_path(path.as_ref()), contents.into()))
            .collect();
        Self::from_kind(TreeKind::Files(Arc::new(files)))
    }

    /// An empty tree.
    pub fn empty() -> Self {
        Self::from_kind(TreeKind::Files(Arc::default()))
    }

    /// Select, move and rename files of `input`.
    pub fn funnel(input: Tree, options: FunnelOptions) -> Self {
        Self::from_kind(TreeKind::Funnel { input, options })
    }

    /// Union of `inputs`, in order.
    pub fn merge(inputs: impl IntoIterator<Item = Tree>, options: MergeOptions) -> Self {
        Self::from_kind(TreeKind::Merge {
            inputs: inputs.into_iter().collect(),
            options,
        })
    }

    /// A single file made by joining files of `input` in a fixed order.
    pub fn concat(input: Tree, options: ConcatOptions) -> Self {
        Self::from_kind(TreeKind::Concat { input, options })
    }

    /// Rewrite the contents of files accepted by `filter`.
    pub fn filter(input: Tree, filter: Arc<dyn Filter>) -> Self {
        Self::from_kind(TreeKind::Filter { input, filter })
    }

    /// Label this tree for diagnostics. Returns a new tree.
    pub fn annotate(&self, label: impl Into<String>) -> Self {
        Self {
            node: Arc::new(Node {
                kind: self.node.kind.clone(),
                annotation: Some(label.into()),
            }),
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        self.node.annotation.as_deref()
    }

    pub fn kind(&self) -> &TreeKind {
        &self.node.kind
    }

    /// Short node type name, for logs.
    pub fn kind_name(&self) -> &'static str {
        match &self.node.kind {
            TreeKind::Source(_) => "source",
            TreeKind::Files(_) => "files",
            TreeKind::Funnel { .. } => "funnel",
            TreeKind::Merge { .. } => "merge",
            TreeKind::Concat { .. } => "concat",
            TreeKind::Filter { .. } => "filter",
        }
    }

    /// Whether both handles point at the same descriptor.
    pub fn ptr_eq(a: &Tree, b: &Tree) -> bool {
        Arc::ptr_eq(&a.node, &b.node)
    }

    /// Stable identity of the descriptor, used to memoize builds.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.node) as usize
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Tree");
        debug.field("kind", &self.kind_name());
        if let Some(annotation) = &self.node.annotation {
            debug.field("annotation", annotation);
        }
        match &self.node.kind {
            TreeKind::Source(root) => debug.field("root", root),
            TreeKind::Files(files) => debug.field("files", &files.len()),
            TreeKind::Funnel { input, .. }
            | TreeKind::Concat { input, .. }
            | TreeKind::Filter { input, .. } => debug.field("input", input),
            TreeKind::Merge { inputs, .. } => debug.field("inputs", inputs),
        };
        debug.finish()
    }
}

/// Options for [`Tree::funnel`].
#[derive(Clone, Default)]
pub struct FunnelOptions {
    /// Only files below this directory are kept; it is stripped from their paths.
    pub src_dir: Option<String>,
    /// Prefix added to every kept path.
    pub dest_dir: Option<String>,
    /// Keep only these extensions (lowercase, no dot). Empty keeps everything.
    pub include_extensions: Vec<String>,
    /// Keep only these `src_dir`-relative paths.
    pub files: Option<Vec<String>>,
    /// Rename kept files. Runs on the `src_dir`-relative path, before `dest_dir`.
    pub destination: Option<DestinationFn>,
    /// Treat a missing `src_dir` as an empty tree instead of an error.
    pub allow_empty: bool,
}

impl FunnelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_dir(mut self, dir: impl AsRef<str>) -> Self {
        self.src_dir = Some(normalize_path(dir.as_ref()));
        self
    }

    pub fn dest_dir(mut self, dir: impl AsRef<str>) -> Self {
        self.dest_dir = Some(normalize_path(dir.as_ref()));
        self
    }

    pub fn include_extension(mut self, ext: impl AsRef<str>) -> Self {
        self.include_extensions
            .push(ext.as_ref().trim_start_matches('.').to_ascii_lowercase());
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.files = Some(
            files
                .into_iter()
                .map(|file| normalize_path(file.as_ref()))
                .collect(),
        );
        self
    }

    pub fn destination<F>(mut self, destination: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.destination = Some(Arc::new(destination));
        self
    }

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

/// Options for [`Tree::merge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Later inputs replace files of earlier ones instead of failing.
    pub overwrite: bool,
}

impl MergeOptions {
    pub fn overwrite() -> Self {
        Self { overwrite: true }
    }
}

/// Files picked up by a concat at build time rather than listed up front.
#[derive(Debug, Clone, Default)]
pub struct FileMatch {
    /// Directory to search, tree-relative. Empty searches the whole tree.
    pub dir: String,
    /// Extensions to match (lowercase, no dot). Empty matches everything.
    pub extensions: Vec<String>,
}

impl FileMatch {
    pub fn new(dir: impl AsRef<str>) -> Self {
        Self {
            dir: normalize_path(dir.as_ref()),
            extensions: Vec::new(),
        }
    }

    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        self.extensions
            .push(ext.as_ref().trim_start_matches('.').to_ascii_lowercase());
        self
    }
}

/// Options for [`Tree::concat`].
///
/// `header_files` come first, in the given order, and must all exist.
/// Files found through `input_files` follow in sorted path order. A path is
/// only ever written once, at its first position.
#[derive(Debug, Clone)]
pub struct ConcatOptions {
    pub output_file: String,
    pub header_files: Vec<String>,
    pub input_files: Option<FileMatch>,
    pub separator: String,
}

impl ConcatOptions {
    pub fn new(output_file: impl AsRef<str>) -> Self {
        Self {
            output_file: normalize_path(output_file.as_ref()),
            header_files: Vec::new(),
            input_files: None,
            separator: "\n".to_string(),
        }
    }

    pub fn header_files(mut self, files: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.header_files = files
            .into_iter()
            .map(|file| normalize_path(file.as_ref()))
            .collect();
        self
    }

    pub fn input_files(mut self, matcher: FileMatch) -> Self {
        self.input_files = Some(matcher);
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let tree = Tree::from_files([("a.css", "a")]);
        let clone = tree.clone();
        assert!(Tree::ptr_eq(&tree, &clone));
    }

    #[test]
    fn annotate_creates_new_identity() {
        let tree = Tree::empty();
        let labeled = tree.annotate("Packaged Styles");
        assert!(!Tree::ptr_eq(&tree, &labeled));
        assert_eq!(labeled.annotation(), Some("Packaged Styles"));
        assert_eq!(tree.annotation(), None);
        assert_eq!(labeled.kind_name(), "files");
    }

    #[test]
    fn concat_options_normalize_paths() {
        let options = ConcatOptions::new("/assets/vendor.css").header_files(["./vendor/a.css"]);
        assert_eq!(options.output_file, "assets/vendor.css");
        assert_eq!(options.header_files, vec!["vendor/a.css"]);
        assert_eq!(options.separator, "\n");
    }

    #[test]
    fn debug_shows_structure() {
        let tree = Tree::merge(
            [Tree::source("/tmp/in"), Tree::empty()],
            MergeOptions::default(),
        )
        .annotate("TreeMerger");
        let rendered = format!("{:?}", tree);
        assert!(rendered.contains("merge"));
        assert!(rendered.contains("TreeMerger"));
        assert!(rendered.contains("/tmp/in"));
    }
}
