//! NovaWallet key protection
//!
//! Keeps a wallet's raw private key at rest behind a password:
//! - `vault`: PBKDF2 key stretching, AES-256-GCM encryption and the hex blob format
//! - `state`: the persisted wallet record holding the blob and non-secret metadata
//! - `wallet`: create/import/unlock flows over an external chain SDK
//!
//! # Security Model
//!
//! - Only the encrypted blob is ever persisted
//! - Decrypted keys live in zeroize-on-drop wrappers and are never logged
//! - A wrong password and a corrupted blob are indistinguishable by design of AEAD

pub mod config;
pub mod error;
pub mod state;
pub mod vault;
pub mod wallet;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use state::{Network, StateStore, WalletState};
pub use vault::{
    decrypt_private_key, encrypt_private_key, generate_private_key, is_valid_private_key, sha256,
    EncryptedBlob, PrivateKey, SecretCodec, VaultError,
};
pub use wallet::{GeneratedWallet, WalletSdk, WalletService};
