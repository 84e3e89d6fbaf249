//! Working directory paths to repository-relative paths.

use std::path::{Component, Path, PathBuf};

/// Strip the working directory `root` from `path`.
///
/// A path outside `root` (or one that is already relative) comes back
/// unchanged rather than as an error, so applying this twice is the same as
/// applying it once.
pub fn normalize(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Render a relative path the way git spells it: `/` separated, no `.`.
pub fn repo_path_string(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
