//! Sensitive value wrappers.
//!
//! Plaintext keys and derived encryption keys only ever live inside these
//! types. Both are zeroized on drop and neither can be printed or serialized.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Marker prepended to hex-encoded private keys.
pub const HEX_PREFIX: &str = "0x";

/// Length of a derived AES-256 key in bytes.
pub const DERIVED_KEY_LEN: usize = 32;

/// A raw private key in its `0x`-prefixed textual form.
///
/// Obtained from decryption (or key generation) and handed straight to the
/// signer. Must never be persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Wrap a key string, adding the hex marker if it is missing.
    pub fn new(key: impl Into<String>) -> Self {
        let mut key = key.into();
        if !key.starts_with(HEX_PREFIX) {
            key.insert_str(0, HEX_PREFIX);
        }
        Self(key)
    }

    /// Re-apply the marker to digits recovered by decryption.
    pub(crate) fn from_digits(digits: &str) -> Self {
        Self(format!("{}{}", HEX_PREFIX, digits))
    }

    /// The full key including the `0x` marker.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// The key digits without the `0x` marker.
    pub fn hex_digits(&self) -> &str {
        strip_hex_prefix(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&"[REDACTED]").finish()
    }
}

/// Symmetric key stretched from a password and salt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_LEN]);

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; DERIVED_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Drop a leading `0x` marker if present.
pub fn strip_hex_prefix(value: &str) -> &str {
    value.strip_prefix(HEX_PREFIX).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_new_adds_missing_prefix() {
        let key = PrivateKey::new(&KEY[2..]);
        assert_eq!(key.expose_secret(), KEY);
        assert_eq!(key.hex_digits(), &KEY[2..]);
    }

    #[test]
    fn test_new_keeps_existing_prefix() {
        let key = PrivateKey::new(KEY);
        assert_eq!(key.expose_secret(), KEY);
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = PrivateKey::new(KEY);
        let debug_str = format!("{:?}", key);
        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));

        let derived = DerivedKey::from_bytes([7u8; DERIVED_KEY_LEN]);
        assert_eq!(format!("{:?}", derived), "DerivedKey([REDACTED])");
    }

    #[test]
    fn test_strip_hex_prefix() {
        assert_eq!(strip_hex_prefix("0xabc"), "abc");
        assert_eq!(strip_hex_prefix("abc"), "abc");
        assert_eq!(strip_hex_prefix(""), "");
    }
}
