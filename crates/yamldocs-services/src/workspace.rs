//! Workspace root providers.
//!
//! The host owns the notion of "current project". The server asks for the
//! root on every API request and never caches the answer.

use std::path::PathBuf;

use parking_lot::RwLock;

/// Source of the workspace root for a single request.
pub trait WorkspaceRootProvider: Send + Sync {
    /// The current root directory, or `None` when no project is open.
    fn workspace_root(&self) -> Option<PathBuf>;
}

impl<F> WorkspaceRootProvider for F
where
    F: Fn() -> Option<PathBuf> + Send + Sync,
{
    fn workspace_root(&self) -> Option<PathBuf> {
        self()
    }
}

/// A root fixed for the lifetime of the server.
#[derive(Debug, Clone)]
pub struct FixedRoot(PathBuf);

impl FixedRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }
}

impl WorkspaceRootProvider for FixedRoot {
    fn workspace_root(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// No project open; every API request answers 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoot;

impl WorkspaceRootProvider for NoRoot {
    fn workspace_root(&self) -> Option<PathBuf> {
        None
    }
}

/// A root the host can switch or clear while the server runs.
#[derive(Debug, Default)]
pub struct SharedRoot {
    root: RwLock<Option<PathBuf>>,
}

impl SharedRoot {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    pub fn set(&self, root: PathBuf) {
        *self.root.write() = Some(root);
    }

    pub fn clear(&self) {
        *self.root.write() = None;
    }
}

impl WorkspaceRootProvider for SharedRoot {
    fn workspace_root(&self) -> Option<PathBuf> {
        self.root.read().clone()
    }
}
