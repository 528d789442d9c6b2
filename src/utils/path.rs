//! Path utilities for site-relative asset handling

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if raw.starts_with('~') {
        PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
    } else {
        path.to_path_buf()
    }
}

/// Resolve a configured path against the website root.
///
/// `~` is expanded first; absolute paths are returned as they are.
pub fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

/// Make a path absolute against the current directory and drop `.` segments.
///
/// Existing paths are canonicalized so symlinks and `..` resolve the way
/// the file system sees them.
pub fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Forward-slash path of `path` relative to `root`, as HTML references it.
///
/// Paths outside the root are rendered in full.
pub fn site_relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.is_absolute() {
        return relative.to_string_lossy().replace('\\', "/");
    }

    relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercased extension without the dot
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// File name for display
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
