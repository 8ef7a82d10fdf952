//! Workspace path resolution.
//!
//! A caller-supplied relative path is joined onto the canonical workspace
//! root and checked to stay at or below it. Parent segments and absolute
//! paths are rejected outright; symlinks are followed through the deepest
//! existing ancestor so a link pointing outside the root is caught even
//! when the final component does not exist yet.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use yamldocs_protocol::ApiError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("empty path")]
    Empty,

    #[error("path `{0}` escapes the workspace root")]
    Escape(String),

    #[error("workspace root {} is unavailable: {source}", root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Empty => ApiError::MissingParameter(yamldocs_protocol::Routes::PATH_PARAM),
            ResolveError::Escape(path) => ApiError::Escape(path),
            ResolveError::RootUnavailable { .. } => ApiError::RootUnavailable,
        }
    }
}

/// Resolve `relative` against `root`.
///
/// The returned path is absolute and equal to or a descendant of the
/// canonicalized root. It may not exist.
pub fn resolve(root: &Path, relative: &str) -> Result<PathBuf, ResolveError> {
    if relative.is_empty() {
        return Err(ResolveError::Empty);
    }

    let canonical_root = canonical_root(root)?;

    let mut candidate = canonical_root.clone();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => candidate.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ResolveError::Escape(relative.to_string()));
            }
        }
    }

    let resolved = canonicalize_existing(&candidate)
        .ok_or_else(|| ResolveError::Escape(relative.to_string()))?;

    if resolved.starts_with(&canonical_root) {
        Ok(resolved)
    } else {
        Err(ResolveError::Escape(relative.to_string()))
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, ResolveError> {
    let canonical = root.canonicalize().map_err(|source| ResolveError::RootUnavailable {
        root: root.to_path_buf(),
        source,
    })?;
    if !canonical.is_dir() {
        return Err(ResolveError::RootUnavailable {
            root: root.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }
    Ok(canonical)
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the
/// missing tail. Returns `None` for an entry that exists but cannot be
/// resolved, i.e. a dangling symlink, since its eventual target is unknown.
fn canonicalize_existing(path: &Path) -> Option<PathBuf> {
    let mut tail: Vec<OsString> = Vec::new();
    let mut cursor = path;

    loop {
        match cursor.canonicalize() {
            Ok(mut base) => {
                for part in tail.iter().rev() {
                    base.push(part);
                }
                return Some(base);
            }
            Err(_) if cursor.symlink_metadata().is_ok() => return None,
            Err(_) => match (cursor.parent(), cursor.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    cursor = parent;
                }
                _ => return None,
            },
        }
    }
}
