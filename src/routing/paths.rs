//! Path translation between Radarr's and Unmanic's views of the filesystem.

use crate::error::RoutingError;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Lexically normalize a path: drop `.` and resolve `..` without touching
/// the filesystem. `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    path.clean()
}

/// Whether `path` lies inside `root` (or is `root`), compared component-wise
/// after normalization. Only absolute roots contain anything.
pub fn is_within(path: &Path, root: &Path) -> bool {
    let root = normalize(root);
    root.is_absolute() && normalize(path).starts_with(root)
}

/// Directory above `source_root`, the top-level root of the source service.
/// A root with no parent is its own service root.
pub fn service_root(source_root: &Path) -> PathBuf {
    let source_root = normalize(source_root);
    match source_root.parent() {
        Some(parent) => parent.to_path_buf(),
        None => source_root,
    }
}

/// Rewrite `file_path` from the source service onto `library_root`.
///
/// The suffix is taken relative to the parent of `source_root`, so the movie
/// folder name survives the move:
///
/// ```text
/// file_path    /movies/Foo (2020)/Foo.mkv
/// source_root  /movies/Foo (2020)
/// library_root /lib1
/// result       /lib1/Foo (2020)/Foo.mkv
/// ```
pub fn translate(
    file_path: &Path,
    source_root: Option<&Path>,
    library_root: &Path,
) -> Result<PathBuf, RoutingError> {
    let source_root = source_root.ok_or(RoutingError::MissingRoot)?;
    let root = service_root(source_root);
    let file_path = normalize(file_path);
    let outside = || RoutingError::PathOutsideRoot {
        path: file_path.clone(),
        root: root.clone(),
    };

    if !root.is_absolute() || !file_path.is_absolute() {
        return Err(outside());
    }

    let suffix = file_path.strip_prefix(&root).map_err(|_| outside())?;

    let library_root = normalize(library_root);
    let translated = normalize(&library_root.join(suffix));
    if !translated.starts_with(&library_root) {
        return Err(outside());
    }

    Ok(translated)
}
