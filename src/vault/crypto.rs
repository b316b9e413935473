//! Cryptographic primitives for at-rest key protection.
//!
//! Uses:
//! - PBKDF2-HMAC-SHA256 for password stretching
//! - The operating system CSPRNG for salts, nonces and fresh keys
//! - SHA-256 for auxiliary digests

use crate::vault::secrets::{DerivedKey, DERIVED_KEY_LEN, HEX_PREFIX};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

/// PBKDF2 work factor. Part of the stored format: changing it makes
/// existing blobs undecryptable.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Raw private key length in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Vault errors.
///
/// None of the messages carry key material or passwords.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Malformed encrypted blob: {0}")]
    MalformedBlob(String),

    /// Wrong password and tampered ciphertext are indistinguishable.
    #[error("Decryption failed - invalid password")]
    DecryptionFailed,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Result type for vault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// A cryptographically secure byte source.
///
/// Production code uses [`OsEntropy`]. Tests may substitute a deterministic
/// source to check encoding layout, never to check security properties.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely or fail. Implementations must not fall back to a
    /// weaker generator.
    fn try_fill(&self, dest: &mut [u8]) -> VaultResult<()>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn try_fill(&self, dest: &mut [u8]) -> VaultResult<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| VaultError::EntropyUnavailable(e.to_string()))
    }
}

/// Draw `N` random bytes from `entropy`.
pub fn random_bytes<const N: usize>(entropy: &dyn EntropySource) -> VaultResult<[u8; N]> {
    let mut bytes = [0u8; N];
    entropy.try_fill(&mut bytes)?;
    Ok(bytes)
}

/// Draw `len` random bytes and return them hex-encoded.
pub fn random_hex(entropy: &dyn EntropySource, len: usize) -> VaultResult<String> {
    let mut bytes = vec![0u8; len];
    entropy.try_fill(&mut bytes)?;
    Ok(hex_encode(&bytes))
}

/// Lowercase hex encoding.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex in either case. Odd length or non-hex digits are malformed.
pub fn hex_decode(hex_str: &str) -> VaultResult<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| VaultError::MalformedBlob(e.to_string()))
}

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
pub fn sha256(input: &str) -> String {
    hex_encode(&Sha256::digest(input.as_bytes()))
}

/// Stretch `password` with `salt` into a 256-bit key.
///
/// Deterministic in its inputs and deliberately slow (tens of milliseconds).
pub fn derive_key(password: &str, salt: &[u8]) -> DerivedKey {
    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    let derived = DerivedKey::from_bytes(key);
    // `key` was copied into `derived`; wipe the stack copy.
    key.zeroize();
    derived
}

/// Generate a fresh random private key as `0x` + 64 hex digits.
pub fn generate_private_key() -> VaultResult<String> {
    generate_private_key_with(&OsEntropy)
}

/// Generate a private key from a specific entropy source.
pub fn generate_private_key_with(entropy: &dyn EntropySource) -> VaultResult<String> {
    let bytes = Zeroizing::new(random_bytes::<PRIVATE_KEY_LEN>(entropy)?);
    Ok(format!("{}{}", HEX_PREFIX, hex_encode(&*bytes)))
}

/// Structural check: `0x` followed by exactly 64 hex digits (either case).
pub fn is_valid_private_key(candidate: &str) -> bool {
    match candidate.strip_prefix(HEX_PREFIX) {
        Some(digits) => {
            digits.len() == PRIVATE_KEY_LEN * 2 && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}
