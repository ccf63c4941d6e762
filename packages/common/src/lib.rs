//! Paste fingerprinting and storage shared by the nopaste binaries.

pub mod storage;

pub use storage::{BlobStore, Fingerprint, StorageError};
