use std::sync::Arc;

use common::storage::BlobStore;

use crate::assets::AssetProvider;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlobStore>,
    pub assets: Arc<dyn AssetProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlobStore>, assets: Arc<dyn AssetProvider>) -> Self {
        Self { store, assets }
    }
}
