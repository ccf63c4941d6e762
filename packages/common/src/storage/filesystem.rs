use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::StorageError;
use super::hash::Fingerprint;
use super::traits::BlobStore;

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Filesystem-backed paste store.
///
/// Each paste is a single file named by its fingerprint, directly inside
/// `root`. Writes are staged in `{root}/.tmp/` and renamed into place so
/// readers never observe a partially written paste.
pub struct FilesystemBlobStore {
    root: PathBuf,
}

impl FilesystemBlobStore {
    /// Create a new filesystem store, creating `root` and its parents with
    /// owner-only permissions if they do not exist.
    pub async fn new(root: PathBuf) -> Result<Self, StorageError> {
        create_private_dir(&root).await?;
        create_private_dir(&root.join(".tmp")).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.as_str())
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

async fn create_private_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}

async fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    opts.mode(FILE_MODE);

    let mut file = opts.open(path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, fingerprint: &Fingerprint, data: &[u8]) -> Result<(), StorageError> {
        let blob_path = self.blob_path(fingerprint);

        match fs::read(&blob_path).await {
            Ok(existing) if existing == data => {
                debug!(%fingerprint, "Paste already stored");
                return Ok(());
            }
            Ok(_) => return Err(StorageError::Collision(fingerprint.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_private(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, fingerprint: &Fingerprint) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.blob_path(fingerprint)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(fingerprint.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
