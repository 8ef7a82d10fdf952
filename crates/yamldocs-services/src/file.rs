//! File service — the exists / read / save operations behind `/api/*`.
//!
//! Every operation validates the `path` parameter, asks the root provider
//! for the current workspace root, and resolves through [`crate::resolve`]
//! before touching the filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use yamldocs_protocol::routes::required_path;
use yamldocs_protocol::ApiError;

use crate::resolve::resolve;
use crate::workspace::WorkspaceRootProvider;

/// File service implementation.
pub struct FileService {
    roots: Arc<dyn WorkspaceRootProvider>,
}

impl FileService {
    pub fn new(roots: Arc<dyn WorkspaceRootProvider>) -> Self {
        Self { roots }
    }

    /// Resolve a caller path against the root the provider reports right now.
    fn resolve_path(&self, path: Option<&str>) -> Result<PathBuf, ApiError> {
        let path = required_path(path)?;
        let root = self.roots.workspace_root().ok_or(ApiError::RootUnavailable)?;
        Ok(resolve(&root, path)?)
    }

    /// Succeeds when the path names an existing file or directory.
    pub async fn exists(&self, path: Option<&str>) -> Result<(), ApiError> {
        let resolved = self.resolve_path(path)?;

        match tokio::fs::metadata(&resolved).await {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!("exists miss for {}: {e}", resolved.display());
                Err(ApiError::NotFound(display_path(path)))
            }
        }
    }

    /// Read a whole file. Missing paths and directories are both "not found".
    pub async fn read(&self, path: Option<&str>) -> Result<Vec<u8>, ApiError> {
        let resolved = self.resolve_path(path)?;

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(ApiError::NotFound(display_path(path))),
        }

        tokio::fs::read(&resolved)
            .await
            .map_err(|e| ApiError::io(resolved.display(), e))
    }

    /// Stream `body` into the target file, creating or truncating it.
    ///
    /// The parent directory must already exist; intermediate directories are
    /// never created. Nothing is written when the parent check fails.
    /// Returns the number of bytes written.
    pub async fn save<S, E>(&self, path: Option<&str>, body: S) -> Result<u64, ApiError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let target = self.resolve_path(path)?;

        let parent_is_dir = match target.parent() {
            Some(parent) => tokio::fs::metadata(parent)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false),
            None => false,
        };
        if !parent_is_dir {
            return Err(ApiError::NotFound(format!(
                "parent directory of {}",
                display_path(path)
            )));
        }

        let mut file = tokio::fs::File::create(&target)
            .await
            .map_err(|e| ApiError::io(target.display(), e))?;

        let mut body = std::pin::pin!(body);
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ApiError::io(target.display(), std::io::Error::other(e)))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ApiError::io(target.display(), e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| ApiError::io(target.display(), e))?;

        debug!("wrote {written} bytes to {}", target.display());
        Ok(written)
    }
}

fn display_path(path: Option<&str>) -> String {
    path.unwrap_or_default().to_string()
}
