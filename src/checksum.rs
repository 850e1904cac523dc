use fs_err as fs;
use sha2::{Digest as _, Sha256};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("checksum manifest unavailable: {0}")]
    ManifestUnavailable(String),
    #[error("reading checksum manifest: {0}")]
    ManifestRead(#[source] io::Error),
    #[error("computing digest of {path}: {source}")]
    Digest {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("no manifest entry for '{0}'")]
    EntryNotFound(String),
    #[error("checksum mismatch: manifest says {expected}, artifact hashes to {actual}")]
    Mismatch { expected: String, actual: String },
}

/// Hashing capability. One production implementation; tests inject fakes.
pub trait DigestBackend {
    fn hex_digest(&self, path: &Path) -> Result<String, ChecksumError>;
}

/// Native SHA-256 via the `sha2` crate.
pub struct Sha256Digest;

impl DigestBackend for Sha256Digest {
    fn hex_digest(&self, path: &Path) -> Result<String, ChecksumError> {
        let mut file = fs::File::open(path).map_err(|source| ChecksumError::Digest {
            path: path.display().to_string(),
            source,
        })?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher).map_err(|source| ChecksumError::Digest {
            path: path.display().to_string(),
            source,
        })?;
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Look up `key` in a manifest of `<hex digest> <name>` lines.
fn manifest_entry(manifest: &str, key: &str) -> Option<String> {
    for line in manifest.lines() {
        let mut fields = line.split_whitespace();
        let (Some(digest), Some(name)) = (fields.next(), fields.next()) else {
            continue;
        };
        if name == key {
            return Some(digest.to_string());
        }
    }
    None
}

/// Validate a downloaded artifact against the fetched manifest. Digests are
/// compared by exact string equality of the hex encoding; any mismatch
/// aborts the install. An unverified binary is never installed.
pub fn verify(
    digest: &dyn DigestBackend,
    artifact: &Path,
    manifest: &Path,
    key: &str,
) -> Result<(), ChecksumError> {
    let manifest_text = fs::read_to_string(manifest).map_err(ChecksumError::ManifestRead)?;
    let expected = manifest_entry(&manifest_text, key)
        .ok_or_else(|| ChecksumError::EntryNotFound(key.to_string()))?;
    let actual = digest.hex_digest(artifact)?;
    if actual != expected {
        return Err(ChecksumError::Mismatch { expected, actual });
    }
    Ok(())
}
