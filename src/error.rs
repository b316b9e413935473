use crate::vault::VaultError;
use thiserror::Error;

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid private key format")]
    InvalidPrivateKey,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Wallet not initialized")]
    NotInitialized,

    #[error("Wallet already initialized; reset it first")]
    AlreadyInitialized,

    #[error("Wallet SDK error: {0}")]
    Sdk(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn sdk<S: Into<String>>(msg: S) -> Self {
        Self::Sdk(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// True when a decryption attempt failed authentication, which the user
    /// should see as "invalid password".
    pub fn is_invalid_password(&self) -> bool {
        matches!(self, Self::Vault(VaultError::DecryptionFailed))
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
