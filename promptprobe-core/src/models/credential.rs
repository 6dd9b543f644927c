//! API key newtype.

use std::fmt;

/// Number of leading characters shown by [`ApiKey::masked`].
const MASK_PREFIX_LEN: usize = 6;

/// A secret API key.
///
/// `Debug` and `Display` never print the secret. Use [`ApiKey::expose`]
/// only where the raw value must leave the process (request URLs).
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length of the secret in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns true if the secret is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first few characters followed by `...`, for startup diagnostics.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(MASK_PREFIX_LEN).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak() {
        let key = ApiKey::new("AIzaSyVerySecret");
        assert!(!format!("{key:?}").contains("Secret"));
        assert!(!key.to_string().contains("Secret"));
    }

    #[test]
    fn test_masked_prefix() {
        assert_eq!(ApiKey::new("AIzaSyVerySecret").masked(), "AIzaSy...");
        assert_eq!(ApiKey::new("abc").masked(), "abc...");
    }

    #[test]
    fn test_blank() {
        assert!(ApiKey::new("   ").is_blank());
        assert!(!ApiKey::new("k").is_blank());
        assert_eq!(ApiKey::new("k").len(), 1);
    }
}
