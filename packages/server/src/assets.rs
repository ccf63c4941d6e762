//! Read-only provider for the static files bundled with the server.
//!
//! Handlers only see [`AssetProvider`]; how the files get into the binary is
//! up to the implementation.

use std::borrow::Cow;
use std::collections::HashMap;

use rust_embed::RustEmbed;

/// A bundled file ready to be served.
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Cow<'static, [u8]>,
    pub content_type: String,
}

impl Asset {
    fn new(path: &str, data: Cow<'static, [u8]>) -> Self {
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Self { data, content_type }
    }
}

pub trait AssetProvider: Send + Sync {
    /// Look up an asset by its path relative to the bundle root, e.g.
    /// `index.html` or `static/style.css`.
    fn get(&self, path: &str) -> Option<Asset>;
}

/// Files under `public/`, compiled into the binary.
#[derive(RustEmbed)]
#[folder = "public/"]
struct Bundle;

#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetProvider for EmbeddedAssets {
    fn get(&self, path: &str) -> Option<Asset> {
        Bundle::get(path).map(|file| Asset::new(path, file.data))
    }
}

/// In-memory assets, for tests and for embedding a custom page.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<String, Cow<'static, [u8]>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, data: impl Into<Cow<'static, [u8]>>) -> Self {
        self.files.insert(path.into(), data.into());
        self
    }
}

impl AssetProvider for MemoryAssets {
    fn get(&self, path: &str) -> Option<Asset> {
        self.files
            .get(path)
            .map(|data| Asset::new(path, data.clone()))
    }
}
