//! Sealed-box encryption of secret values
//!
//! GitHub Actions secrets must be encrypted against the repository's
//! public key before upload (libsodium sealed box). The sealer takes the
//! base64 key the API hands out and returns base64 ciphertext ready to
//! transmit. Encryption is randomized per call, so identical inputs do
//! not produce identical ciphertexts. No key material outlives the call.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crypto_box::{aead::OsRng, PublicKey};

use crate::{Error, Result};

/// Capability for sealing plaintext secrets against a public key
pub trait SecretSealer: Send + Sync {
    /// Seal `plaintext` against a base64-encoded 32-byte public key,
    /// returning base64 ciphertext safe for transmission.
    fn seal(&self, public_key_b64: &str, plaintext: &str) -> Result<String>;
}

/// libsodium-compatible sealed-box sealer
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedBoxSealer;

impl SecretSealer for SealedBoxSealer {
    fn seal(&self, public_key_b64: &str, plaintext: &str) -> Result<String> {
        let key_bytes = STANDARD
            .decode(public_key_b64)
            .map_err(|e| Error::Seal(format!("Public key is not valid base64: {}", e)))?;

        let key_bytes: [u8; 32] = key_bytes.try_into().map_err(|v: Vec<u8>| {
            Error::Seal(format!("Public key must be 32 bytes, got {}", v.len()))
        })?;

        let public_key = PublicKey::from(key_bytes);

        let sealed = public_key
            .seal(&mut OsRng, plaintext.as_bytes())
            .map_err(|_| Error::Seal("Sealed-box encryption failed".to_string()))?;

        Ok(STANDARD.encode(sealed))
    }
}
