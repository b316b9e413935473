use crate::error::{AppError, AppResult};

/// Minimum password length accepted when a key is first encrypted.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Password rules applied by the wallet before touching the vault.
///
/// The vault itself accepts any password; strength is a caller concern.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_len: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_len: MIN_PASSWORD_LEN,
        }
    }
}

impl PasswordPolicy {
    /// Check a password chosen for a new secret.
    pub fn check_new(&self, password: &str) -> AppResult<()> {
        if password.chars().count() < self.min_len {
            return Err(AppError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_len
            )));
        }
        Ok(())
    }

    /// Check a new password and its confirmation.
    pub fn check_new_confirmed(&self, password: &str, confirmation: &str) -> AppResult<()> {
        self.check_new(password)?;
        if password != confirmation {
            return Err(AppError::PasswordMismatch);
        }
        Ok(())
    }

    /// Check a password entered to unlock an existing secret.
    pub fn check_unlock(&self, password: &str) -> AppResult<()> {
        if password.is_empty() {
            return Err(AppError::PasswordRequired);
        }
        Ok(())
    }
}
