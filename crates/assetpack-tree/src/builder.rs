//! Tree evaluation.
//!
//! [`TreeBuilder`] walks a [`Tree`] descriptor bottom-up and produces a
//! [`Snapshot`]. Within one `build` call every descriptor is evaluated once,
//! however many parents share it.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::path::{extension, join, normalize_path, strip_dir};
use crate::runtime::{NativeRuntime, Runtime};
use crate::snapshot::Snapshot;
use crate::tree::{ConcatOptions, Filter, FunnelOptions, MergeOptions, Tree, TreeKind};
use crate::{Result, TreeError};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Evaluates tree descriptors.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    runtime: Arc<dyn Runtime>,
}

impl TreeBuilder {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    /// Builder backed by the real filesystem, resolving relative roots against `cwd`.
    pub fn native(cwd: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(NativeRuntime::new(cwd)))
    }

    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Evaluate `tree` into its files.
    pub async fn build(&self, tree: &Tree) -> Result<Snapshot> {
        let memo = Mutex::new(FxHashMap::default());
        let snapshot = self.eval(tree, &memo).await?;
        tracing::debug!(
            kind = tree.kind_name(),
            annotation = tree.annotation().unwrap_or(""),
            files = snapshot.len(),
            "built tree"
        );
        Ok(snapshot)
    }

    fn eval<'a>(
        &'a self,
        tree: &'a Tree,
        memo: &'a Mutex<FxHashMap<usize, Snapshot>>,
    ) -> BoxFuture<'a, Result<Snapshot>> {
        Box::pin(async move {
            if let Some(done) = memo.lock().get(&tree.id()) {
                return Ok(done.clone());
            }

            let snapshot = match tree.kind() {
                TreeKind::Source(root) => self.read_source(root).await?,
                TreeKind::Files(files) => files
                    .iter()
                    .map(|(path, contents)| {
                        (path.clone(), Arc::<[u8]>::from(contents.as_slice()))
                    })
                    .collect(),
                TreeKind::Funnel { input, options } => {
                    let input = self.eval(input, memo).await?;
                    funnel(&input, options)?
                }
                TreeKind::Merge { inputs, options } => {
                    let mut built = Vec::with_capacity(inputs.len());
                    for input in inputs {
                        built.push(self.eval(input, memo).await?);
                    }
                    merge(built, *options)?
                }
                TreeKind::Concat { input, options } => {
                    let input = self.eval(input, memo).await?;
                    concat(&input, options)?
                }
                TreeKind::Filter { input, filter } => {
                    let input = self.eval(input, memo).await?;
                    apply_filter(&input, filter.as_ref())?
                }
            };

            memo.lock().insert(tree.id(), snapshot.clone());
            Ok(snapshot)
        })
    }

    async fn read_source(&self, root: &Path) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        let mut pending = vec![(root.to_path_buf(), String::new())];

        while let Some((dir, prefix)) = pending.pop() {
            for name in self.runtime.read_dir(&dir).await? {
                let path = dir.join(&name);
                let relative = join(&prefix, &name);
                let metadata = self.runtime.metadata(&path).await?;
                if metadata.is_dir {
                    pending.push((path, relative));
                } else if metadata.is_file {
                    let contents = self.runtime.read_file(&path).await?;
                    snapshot.insert(relative, Arc::from(contents));
                }
            }
        }

        Ok(snapshot)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::native(".")
    }
}

fn funnel(input: &Snapshot, options: &FunnelOptions) -> Result<Snapshot> {
    let src_dir = options.src_dir.as_deref().unwrap_or("");
    let mut output = Snapshot::new();
    let mut saw_src_dir = src_dir.is_empty();

    for (path, contents) in input.iter() {
        let Some(relative) = strip_dir(path, src_dir) else {
            continue;
        };
        saw_src_dir = true;

        if !options.include_extensions.is_empty() {
            let matches = extension(relative)
                .is_some_and(|ext| options.include_extensions.iter().any(|want| *want == ext));
            if !matches {
                continue;
            }
        }

        if let Some(files) = &options.files {
            if !files.iter().any(|file| file == relative) {
                continue;
            }
        }

        let destination = match &options.destination {
            Some(rename) => match rename(relative) {
                Some(dest) => dest,
                None => continue,
            },
            None => relative.to_string(),
        };
        let destination = match &options.dest_dir {
            Some(dir) => join(dir, &destination),
            None => normalize_path(&destination),
        };

        if output.insert(&destination, contents.clone()).is_some() {
            tracing::debug!(path = %destination, "funnel renamed two files onto one path; last wins");
        }
    }

    if !saw_src_dir && !options.allow_empty {
        return Err(TreeError::MissingDirectory(src_dir.to_string()));
    }

    Ok(output)
}

fn merge(inputs: Vec<Snapshot>, options: MergeOptions) -> Result<Snapshot> {
    let mut output = Snapshot::new();
    for input in inputs {
        for (path, contents) in input.iter() {
            if output.insert(path, contents.clone()).is_some() && !options.overwrite {
                return Err(TreeError::MergeConflict {
                    path: path.to_string(),
                });
            }
        }
    }
    Ok(output)
}

fn concat(input: &Snapshot, options: &ConcatOptions) -> Result<Snapshot> {
    let mut seen = FxHashSet::default();
    let mut parts: Vec<&[u8]> = Vec::new();

    for file in &options.header_files {
        if !seen.insert(file.as_str()) {
            continue;
        }
        let contents = input.get(file).ok_or_else(|| TreeError::MissingFile {
            path: file.clone(),
            output: options.output_file.clone(),
        })?;
        parts.push(contents);
    }

    if let Some(matcher) = &options.input_files {
        for (path, contents) in input.iter() {
            if strip_dir(path, &matcher.dir).is_none() {
                continue;
            }
            if !matcher.extensions.is_empty() {
                let matches = extension(path)
                    .is_some_and(|ext| matcher.extensions.iter().any(|want| *want == ext));
                if !matches {
                    continue;
                }
            }
            if seen.insert(path) {
                parts.push(contents);
            }
        }
    }

    let joined = parts.join(options.separator.as_bytes());
    let mut output = Snapshot::new();
    output.insert(&options.output_file, Arc::from(joined));
    Ok(output)
}

fn apply_filter(input: &Snapshot, filter: &dyn Filter) -> Result<Snapshot> {
    let mut output = Snapshot::new();
    for (path, contents) in input.iter() {
        if filter.can_process(path) {
            let processed = filter.process(path, contents).map_err(|err| {
                tracing::error!(filter = filter.name(), path, "filter failed: {:#}", err);
                TreeError::Filter(err)
            })?;
            output.insert(path, Arc::from(processed));
        } else {
            output.insert(path, contents.clone());
        }
    }
    Ok(output)
}
