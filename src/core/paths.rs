//! Path normalization utilities
//!
//! Document keys are always root-relative and use '/' as separator, whatever
//! the host convention is.

use std::path::{Component, Path, PathBuf};

/// Join the components of a relative path with '/'
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(to_slash_path)
}

/// Resolve a document key under a target root.
///
/// Returns `None` for keys that would land outside the root (absolute paths,
/// `..` segments, drive prefixes) or that have no file name at all.
pub fn resolve_under(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut segments = 0;

    for segment in relative.split('/').filter(|s| !s.is_empty()) {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => resolved.push(name),
            (Some(Component::CurDir), None) => continue,
            _ => return None,
        }
        segments += 1;
    }

    if segments == 0 || relative.starts_with('/') {
        return None;
    }
    Some(resolved)
}

/// Canonical form of a path that may not exist yet.
///
/// Falls back to the canonical parent joined with the file name; `None` when
/// the parent does not exist either.
pub fn canonical_target(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Some(canonical);
    }
    let name = path.file_name()?;
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    parent.canonicalize().ok().map(|p| p.join(name))
}
