//! yamldocs transport layer
//!
//! Owns the loopback HTTP listener and everything around it:
//! - Port allocation (ephemeral, or from a preferred range)
//! - Routing of UI and file API requests
//! - Server lifecycle (start / stop / state) on a bounded worker pool
//! - The host-facing session that points a browser view at the server

pub mod host;
pub mod port;
pub mod router;
pub mod server;

pub use host::{BrowserView, ViewerSession, BLANK_PAGE};
pub use server::{local_url, ConfigError, ServerConfig, ServerStatus, StartError, WebServer};
