use async_trait::async_trait;

use super::error::StorageError;
use super::hash::Fingerprint;

/// Paste storage keyed by fingerprint.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `fingerprint`.
    ///
    /// Storing identical content again is a no-op. Storing different content
    /// under an occupied fingerprint fails with [`StorageError::Collision`].
    async fn put(&self, fingerprint: &Fingerprint, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes stored under `fingerprint`.
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Vec<u8>, StorageError>;
}
