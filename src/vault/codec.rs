//! Password-based encryption of private keys.
//!
//! Blob format (hex-encoded for text storage):
//! - salt: 16 bytes (PBKDF2)
//! - iv: 12 bytes (AES-256-GCM nonce)
//! - ciphertext: AEAD output (= encrypted key digits + 16-byte tag)
//!
//! The `0x` marker is stripped before encryption and restored on decryption.

use crate::vault::crypto::{
    derive_key, hex_decode, hex_encode, random_bytes, EntropySource, OsEntropy, VaultError,
    VaultResult,
};
use crate::vault::secrets::{strip_hex_prefix, PrivateKey};
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use zeroize::Zeroizing;

/// Salt length (PBKDF2)
pub const SALT_LEN: usize = 16;

/// Nonce length (AES-GCM)
pub const IV_LEN: usize = 12;

/// Shortest decodable blob: salt + iv + one ciphertext byte.
pub const MIN_BLOB_LEN: usize = SALT_LEN + IV_LEN + 1;

/// The persisted form of an encrypted private key.
///
/// Serializes as a single lowercase hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncryptedBlob {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    /// Ciphertext with the authentication tag appended
    ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Split raw bytes into salt, iv and ciphertext by fixed offsets.
    pub fn from_bytes(bytes: &[u8]) -> VaultResult<Self> {
        if bytes.len() < MIN_BLOB_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "expected at least {} bytes, got {}",
                MIN_BLOB_LEN,
                bytes.len()
            )));
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        let mut blob = Self {
            salt: [0u8; SALT_LEN],
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        blob.salt.copy_from_slice(salt);
        blob.iv.copy_from_slice(iv);
        Ok(blob)
    }

    /// Parse the hex text form.
    pub fn from_hex(hex_str: &str) -> VaultResult<Self> {
        Self::from_bytes(&hex_decode(hex_str)?)
    }

    /// salt || iv || ciphertext
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_LEN + IV_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.to_bytes())
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for EncryptedBlob {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for EncryptedBlob {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<EncryptedBlob> for String {
    fn from(blob: EncryptedBlob) -> Self {
        blob.to_hex()
    }
}

/// Encrypts and decrypts private keys under a password.
///
/// Stateless apart from the entropy source, so one instance can be shared
/// across threads and calls never interfere.
#[derive(Debug, Clone, Default)]
pub struct SecretCodec<E = OsEntropy> {
    entropy: E,
}

impl SecretCodec<OsEntropy> {
    /// Codec backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self { entropy: OsEntropy }
    }
}

impl<E: EntropySource> SecretCodec<E> {
    pub fn with_entropy(entropy: E) -> Self {
        Self { entropy }
    }

    /// Encrypt `secret` (with or without `0x`) under `password`.
    ///
    /// Fresh salt and iv are drawn on every call, so equal inputs never
    /// produce equal blobs.
    pub fn encrypt(&self, secret: &str, password: &str) -> VaultResult<EncryptedBlob> {
        let salt = random_bytes::<SALT_LEN>(&self.entropy)?;
        let iv = random_bytes::<IV_LEN>(&self.entropy)?;

        let key = derive_key(password, &salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        let plaintext = strip_hex_prefix(secret);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| VaultError::EncryptionFailed)?;

        debug!(ciphertext_len = ciphertext.len(), "Encrypted private key");

        Ok(EncryptedBlob {
            salt,
            iv,
            ciphertext,
        })
    }

    /// Decrypt `blob` with `password`, returning the `0x`-prefixed key.
    ///
    /// A wrong password and a tampered blob both yield
    /// [`VaultError::DecryptionFailed`].
    pub fn decrypt(&self, blob: &EncryptedBlob, password: &str) -> VaultResult<PrivateKey> {
        let key = derive_key(password, &blob.salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        let plaintext = cipher
            .decrypt(Nonce::from_slice(&blob.iv), blob.ciphertext.as_ref())
            .map(Zeroizing::new)
            .map_err(|_| {
                debug!("AEAD authentication failed");
                VaultError::DecryptionFailed
            })?;

        let digits = std::str::from_utf8(&plaintext)
            .map_err(|_| VaultError::MalformedBlob("plaintext is not valid UTF-8".to_string()))?;

        Ok(PrivateKey::from_digits(digits))
    }

    /// Parse a hex blob and decrypt it.
    pub fn decrypt_hex(&self, blob_hex: &str, password: &str) -> VaultResult<PrivateKey> {
        let blob = EncryptedBlob::from_hex(blob_hex)?;
        self.decrypt(&blob, password)
    }
}

/// Encrypt a raw private key with the OS random source and return the hex blob.
pub fn encrypt_private_key(raw_key: &str, password: &str) -> VaultResult<String> {
    Ok(SecretCodec::new().encrypt(raw_key, password)?.to_hex())
}

/// Decrypt a hex blob produced by [`encrypt_private_key`].
pub fn decrypt_private_key(blob_hex: &str, password: &str) -> VaultResult<PrivateKey> {
    SecretCodec::new().decrypt_hex(blob_hex, password)
}
