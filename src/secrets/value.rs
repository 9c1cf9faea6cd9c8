use crate::error::ProvisionError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// A token collected from the operator.
///
/// The plaintext lives inside a zeroizing `SecretString`, so it is wiped on
/// drop and cannot leak through `Debug`. It is only reachable through
/// [`SecretValue::use_secret`], which confines the borrow to a closure.
pub struct SecretValue {
    inner: SecretString,
}

impl SecretValue {
    /// Build a value from raw operator input, trimming surrounding whitespace.
    ///
    /// Empty or whitespace-only input is rejected.
    pub fn from_input(raw: String) -> Result<Self, ProvisionError> {
        let raw = SecretString::new(raw);
        let trimmed = raw.expose_secret().trim();

        if trimmed.is_empty() {
            return Err(ProvisionError::EmptyInput);
        }

        Ok(Self {
            inner: SecretString::new(trimmed.to_string()),
        })
    }

    pub fn use_secret<F, R>(&self, action: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        action(self.inner.expose_secret().as_str())
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}
