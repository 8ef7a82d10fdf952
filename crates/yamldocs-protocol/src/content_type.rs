//! Content-type mapping for bundled UI assets.

use std::path::Path;

/// Content type of every file API read.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// `Cache-Control` value sent with every bundled asset.
pub const NO_CACHE: &str = "no-cache";

/// Derive a `Content-Type` from the file extension of an asset path.
/// Unknown or missing extensions fall back to `text/plain`.
pub fn content_type_for(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => "text/plain",
    }
}
