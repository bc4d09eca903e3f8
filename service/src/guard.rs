//! Directory traversal guard
//!
//! Runs before any filesystem access. Works on path components, never on
//! the path's string form, so a name such as `v1..v2` is not mistaken for
//! a parent reference.

use filehash_core::ProcessError;
use std::path::{Component, Path, PathBuf};

/// Reject `path` if it escapes `root`, or, with no root, if it contains `..`.
///
/// Fails closed: a path or root that cannot be made absolute is rejected.
pub fn check_path(path: &Path, root: Option<&Path>) -> Result<(), ProcessError> {
    let escapes = match root {
        Some(root) => match (normalize(path), normalize(root)) {
            (Some(path), Some(root)) => !path.starts_with(root),
            _ => true,
        },
        None => path.components().any(|c| c == Component::ParentDir),
    };

    if escapes {
        tracing::warn!("Rejected traversal attempt: {:?}", path);
        return Err(ProcessError::TraversalRejected(path.to_path_buf()));
    }
    Ok(())
}

/// Absolute form of `path` with `.` dropped and `..` folded, without touching the disk.
///
/// `None` for paths that have no absolute form, such as the empty path.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Some(normalized)
}
