//! yamldocs protocol types
//!
//! The HTTP surface shared by the server and its tests: route paths,
//! the `path` query parameter, content-type mapping for bundled assets,
//! and the per-request error taxonomy with its status-code mapping.

pub mod content_type;
pub mod error;
pub mod routes;

pub use content_type::{content_type_for, NO_CACHE, TEXT_PLAIN_UTF8};
pub use error::ApiError;
pub use routes::{PathQuery, Routes};
