//! Bundled web UI.
//!
//! The asset set is a closed table compiled into the binary, so serving the
//! UI never touches the filesystem and no request path can reach anything
//! outside it.

use yamldocs_protocol::{content_type_for, Routes};

/// A single embedded file, keyed by its path relative to the bundle root.
#[derive(Debug)]
pub struct Asset {
    pub path: &'static str,
    pub bytes: &'static [u8],
}

impl Asset {
    pub fn content_type(&self) -> &'static str {
        content_type_for(self.path)
    }
}

/// Outcome of looking up a request path in the bundle.
#[derive(Debug)]
pub enum AssetLookup {
    Found(&'static Asset),
    /// Source maps are never served, whether or not one is bundled.
    SourceMap,
    Missing,
}

macro_rules! bundle {
    ($($path:literal),* $(,)?) => {
        &[$(
            Asset {
                path: $path,
                bytes: include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/web/", $path)),
            }
        ),*]
    };
}

static BUNDLED: &[Asset] = bundle![
    "index.html",
    "favicon.svg",
    "css/style.css",
    "js/app.js",
    "js/app.js.map",
    "js/services/FileService.js",
];

/// An immutable mapping from asset path to content.
#[derive(Debug, Clone, Copy)]
pub struct AssetBundle {
    assets: &'static [Asset],
}

impl Default for AssetBundle {
    fn default() -> Self {
        Self::bundled()
    }
}

impl AssetBundle {
    pub const fn new(assets: &'static [Asset]) -> Self {
        Self { assets }
    }

    /// The UI shipped with this build.
    pub fn bundled() -> Self {
        Self::new(BUNDLED)
    }

    pub fn get(&self, path: &str) -> Option<&'static Asset> {
        self.assets.iter().find(|a| a.path == path)
    }

    /// Map a request path (`/`, `/js/app.js`, ...) to an asset.
    pub fn lookup(&self, request_path: &str) -> AssetLookup {
        let path = match request_path {
            "" | Routes::ROOT => "index.html",
            p => p.trim_start_matches('/'),
        };

        if path.ends_with(".map") {
            return AssetLookup::SourceMap;
        }

        match self.get(path) {
            Some(asset) => AssetLookup::Found(asset),
            None => AssetLookup::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Asset> {
        self.assets.iter()
    }
}
