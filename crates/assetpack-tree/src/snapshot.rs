//! Built tree contents.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::path::{normalize_path, strip_dir};
use crate::writer::write_snapshot_to;
use crate::Result;

/// The files a [`Tree`](crate::Tree) evaluated to, keyed by tree-relative path.
///
/// Contents are shared, so cloning a snapshot or passing files between
/// build steps does not copy bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    files: BTreeMap<String, Arc<[u8]>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, returning the previous contents at that path.
    pub fn insert(&mut self, path: impl AsRef<str>, contents: Arc<[u8]>) -> Option<Arc<[u8]>> {
        self.files.insert(normalize_path(path.as_ref()), contents)
    }

    pub fn get(&self, path: &str) -> Option<&Arc<[u8]>> {
        self.files.get(normalize_path(path).as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// File contents as UTF-8, lossily decoded.
    pub fn read(&self, path: &str) -> Option<String> {
        self.get(path)
            .map(|contents| String::from_utf8_lossy(contents).into_owned())
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Immediate children of `dir`: file names and subdirectory names, sorted.
    ///
    /// ```
    /// use assetpack_tree::Snapshot;
    /// use std::sync::Arc;
    ///
    /// let mut snapshot = Snapshot::new();
    /// snapshot.insert("assets/vendor.css", Arc::from(&b""[..]));
    /// snapshot.insert("assets/app.css", Arc::from(&b""[..]));
    /// snapshot.insert("assets/fonts/a.woff", Arc::from(&b""[..]));
    ///
    /// assert_eq!(snapshot.list("assets"), vec!["app.css", "fonts", "vendor.css"]);
    /// ```
    pub fn list(&self, dir: &str) -> Vec<&str> {
        let dir = normalize_path(dir);
        let mut names: Vec<&str> = self
            .files
            .keys()
            .filter_map(|path| strip_dir(path, &dir))
            .filter_map(|rest| rest.split('/').next())
            .collect();
        names.dedup();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<[u8]>)> {
        self.files.iter().map(|(path, contents)| (path.as_str(), contents))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file below `dir`.
    ///
    /// Either all files are written or none are. With `overwrite` false an
    /// existing file is an error.
    pub fn write_to(&self, dir: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        write_snapshot_to(self, dir.as_ref(), overwrite)
    }
}

impl FromIterator<(String, Arc<[u8]>)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Arc<[u8]>)>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for (path, contents) in iter {
            snapshot.insert(path, contents);
        }
        snapshot
    }
}
