use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::AuthError;

pub const DIGEST_LEN: usize = 32;

/// SHA-256 of the admin secret, supplied at deploy time as 64 hex characters.
#[derive(Clone)]
pub struct ReferenceDigest([u8; DIGEST_LEN]);

impl ReferenceDigest {
    pub fn from_hex(value: &str) -> Result<Self, AuthError> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| AuthError::InvalidDigest(e.to_string()))?;
        let digest: [u8; DIGEST_LEN] = bytes.try_into()
            .map_err(|b: Vec<u8>| AuthError::InvalidDigest(format!("expected {} bytes, got {}", DIGEST_LEN, b.len())))?;
        Ok(ReferenceDigest(digest))
    }

    /// Reference digest for a known secret.
    pub fn of_secret(secret: &str) -> Self {
        ReferenceDigest(sha256(secret.as_bytes()))
    }

    /// Constant-time comparison against a computed digest.
    pub fn matches(&self, candidate: &[u8; DIGEST_LEN]) -> bool {
        self.0[..].ct_eq(&candidate[..]).into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ReferenceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReferenceDigest([REDACTED])")
    }
}

pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let hash = Sha256::digest(data);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hash);
    out
}

/// Digests the secret on the blocking pool so a single-threaded runtime
/// keeps running while it hashes.
pub async fn digest_secret(secret: Zeroizing<String>) -> Result<[u8; DIGEST_LEN], AuthError> {
    tokio::task::spawn_blocking(move || sha256(secret.as_bytes()))
        .await
        .map_err(|e| AuthError::DigestFailed(e.to_string()))
}
