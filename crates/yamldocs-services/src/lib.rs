//! yamldocs services
//!
//! Everything a request handler needs below the HTTP layer:
//! - `resolve` — sandboxed resolution of caller paths against the workspace root
//! - `workspace` — providers that hand the server the current root per request
//! - `file` — the exists / read / save operations of the file API
//! - `assets` — the web UI bundle embedded at compile time

pub mod assets;
pub mod file;
pub mod resolve;
pub mod workspace;

pub use assets::{Asset, AssetBundle, AssetLookup};
pub use file::FileService;
pub use resolve::{resolve, ResolveError};
pub use workspace::{FixedRoot, NoRoot, SharedRoot, WorkspaceRootProvider};
