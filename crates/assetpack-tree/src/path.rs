//! Tree-relative path helpers.
//!
//! Every path inside a tree is relative, uses `/` separators and never starts
//! with `/` or `./`. Configuration tends to spell output files as
//! `/assets/app.css`, so everything entering a tree goes through
//! [`normalize_path`] first.

use std::path::Path;

use path_clean::PathClean;

/// Convert a configured path into its tree-relative form.
///
/// `.` and `..` segments and repeated separators are resolved lexically, so
/// two spellings of the same file always compare equal.
///
/// ```
/// use assetpack_tree::normalize_path;
///
/// assert_eq!(normalize_path("/assets/vendor.css"), "assets/vendor.css");
/// assert_eq!(normalize_path("./app/styles/app.css"), "app/styles/app.css");
/// assert_eq!(normalize_path("assets\\app.css"), "assets/app.css");
/// assert_eq!(normalize_path("/assets/x/../app.css"), "assets/app.css");
/// ```
pub fn normalize_path(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    let cleaned = Path::new(&unified).clean();
    let cleaned = cleaned.to_string_lossy().replace('\\', "/");
    match cleaned.trim_start_matches('/') {
        "." => String::new(),
        rest => rest.to_string(),
    }
}

/// Join two tree-relative fragments, ignoring empty ones.
pub(crate) fn join(base: &str, rest: &str) -> String {
    let base = normalize_path(base);
    let base = base.trim_end_matches('/');
    let rest = normalize_path(rest);
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rest),
    }
}

/// Strip `dir/` from the front of `path`, returning the remainder.
pub(crate) fn strip_dir<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        return Some(path);
    }
    path.strip_prefix(dir)?.strip_prefix('/')
}

/// Lowercased extension of a tree path, without the dot.
pub(crate) fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
