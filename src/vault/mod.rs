//! Password-based protection of the wallet private key.
//!
//! This module lets the raw private key be persisted in ordinary storage
//! without being recoverable by anyone who reads that storage without the
//! password.
//!
//! ## Security Model
//!
//! - PBKDF2-HMAC-SHA256 (100,000 iterations) stretches the password with a
//!   fresh 16-byte salt per encryption
//! - AES-256-GCM with a fresh 12-byte nonce encrypts and authenticates the key
//! - A wrong password and a corrupted blob are reported identically
//! - Decrypted keys and derived keys are zeroized on drop
//!
//! ## Usage
//!
//! ```
//! use novawallet::vault::{decrypt_private_key, encrypt_private_key, generate_private_key};
//!
//! let key = generate_private_key().unwrap();
//! let blob = encrypt_private_key(&key, "hunter22").unwrap();
//!
//! // Persist `blob`, later:
//! let recovered = decrypt_private_key(&blob, "hunter22").unwrap();
//! assert_eq!(recovered.expose_secret(), key);
//! ```

pub mod codec;
pub mod crypto;
pub mod secrets;

pub use codec::{
    decrypt_private_key, encrypt_private_key, EncryptedBlob, SecretCodec, IV_LEN, MIN_BLOB_LEN,
    SALT_LEN,
};
pub use crypto::{
    derive_key, generate_private_key, generate_private_key_with, hex_decode, hex_encode,
    is_valid_private_key, random_bytes, random_hex, sha256, EntropySource, OsEntropy, VaultError,
    VaultResult, PBKDF2_ITERATIONS,
};
pub use secrets::{DerivedKey, PrivateKey};
