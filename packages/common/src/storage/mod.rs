mod error;
mod hash;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use hash::{Fingerprint, is_valid_key};
pub use traits::BlobStore;
