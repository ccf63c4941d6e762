use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;

/// A paste fingerprint: the first [`Fingerprint::LEN_BYTES`] bytes of the
/// SHA-256 of the content, as lowercase hex.
///
/// The fingerprint is both the storage key and the URL path segment. Values
/// are only built by [`Fingerprint::derive`] on the write path or by
/// [`Fingerprint::parse`] on the read path, so every instance is safe to join
/// onto a filesystem path.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Number of hash bytes kept.
    pub const LEN_BYTES: usize = 10;
    /// Length of the hex form.
    pub const LEN_HEX: usize = Self::LEN_BYTES * 2;

    /// Compute the fingerprint of the given content.
    pub fn derive(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(hex::encode(&digest[..Self::LEN_BYTES]))
    }

    /// Validate a caller-supplied key.
    ///
    /// Accepts one or more characters from `[a-z0-9]` and nothing else. The
    /// length is not pinned: a well-formed key of another length is simply a
    /// miss in the store.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if is_valid_key(s) {
            return Ok(Self(s.to_owned()));
        }
        let reason = match s.chars().find(|c| !is_key_char(*c)) {
            Some(c) => format!("unexpected character {c:?}"),
            None => "key is empty".to_owned(),
        };
        Err(StorageError::InvalidKey(reason))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `s` is acceptable as a storage key.
pub fn is_valid_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_key_char)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
