//! Wallet lifecycle on top of the vault.
//!
//! Key generation, address derivation and transaction signing belong to the
//! chain SDK and are reached through [`WalletSdk`]. This module only decides
//! when a key is encrypted, when it is decrypted, and makes sure the
//! plaintext never outlives a single operation.

mod policy;
mod service;

pub use policy::{PasswordPolicy, MIN_PASSWORD_LEN};
pub use service::WalletService;

use crate::error::AppResult;
use crate::vault::PrivateKey;

/// A freshly generated wallet returned by the SDK.
#[derive(Debug)]
pub struct GeneratedWallet {
    pub private_key: PrivateKey,
    pub address: String,
}

/// Chain SDK operations the wallet depends on.
///
/// Implementations receive the decrypted key by reference and must not
/// retain it.
pub trait WalletSdk: Send + Sync {
    /// Create a new random wallet.
    fn generate(&self) -> AppResult<GeneratedWallet>;

    /// Reconstruct the wallet address from a raw private key.
    fn address_of(&self, private_key: &PrivateKey) -> AppResult<String>;

    /// Sign a serialized transaction and return the raw signed bytes.
    fn sign_transaction(&self, private_key: &PrivateKey, payload: &[u8]) -> AppResult<Vec<u8>>;
}
