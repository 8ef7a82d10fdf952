//! Route constants — every path the server answers, plus the query shape
//! shared by the file API.

use serde::Deserialize;

use crate::ApiError;

/// All yamldocs route paths.
pub struct Routes;

impl Routes {
    // ── Static UI ───────────────────────────────────────────────────────
    pub const ROOT: &str = "/";

    // ── File API ────────────────────────────────────────────────────────
    pub const API_PREFIX: &str = "/api/";
    pub const EXISTS: &str = "/api/exists";
    pub const FILE: &str = "/api/file";
    pub const SAVE: &str = "/api/save";

    /// Query parameter carrying the workspace-relative path.
    pub const PATH_PARAM: &str = "path";

    /// `Allow` header value for the read-only routes.
    pub const ALLOW_GET: &str = "GET, HEAD";
    /// `Allow` header value for the save route.
    pub const ALLOW_POST: &str = "POST";
}

/// Returns true if the path belongs to the file API rather than the UI bundle.
pub fn is_api_route(path: &str) -> bool {
    path.starts_with(Routes::API_PREFIX)
}

/// Query string accepted by every file API route: `?path=<relative path>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathQuery {
    pub path: Option<String>,
}

/// Validate an optional `path` parameter.
pub fn required_path(path: Option<&str>) -> Result<&str, ApiError> {
    match path {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ApiError::MissingParameter(Routes::PATH_PARAM)),
    }
}
