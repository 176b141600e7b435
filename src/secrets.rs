//! Resolution of the LLM API key.
//!
//! The key is looked up in the OS keyring first and then in the environment
//! (a local `.env` file is loaded into the environment at startup). A missing
//! key is a fatal configuration error.

use crate::error::{ChatError, Result};
use keyring::Entry;
use tracing::{debug, warn};

const SERVICE_NAME: &str = "chat-mysql";

/// Name of the secret holding the Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Where a secret was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Keyring,
    Environment,
}

/// Looks up secrets by name across the configured stores.
#[derive(Debug, Clone)]
pub struct SecretStore {
    use_keyring: bool,
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore {
    /// Creates a store that consults the OS keyring and the environment.
    pub fn new() -> Self {
        Self { use_keyring: true }
    }

    /// Creates a store that only consults the environment.
    pub fn env_only() -> Self {
        Self { use_keyring: false }
    }

    /// Returns the secret and where it came from, if present anywhere.
    pub fn lookup(&self, name: &str) -> Option<(String, SecretSource)> {
        if self.use_keyring {
            if let Some(secret) = Self::from_keyring(name) {
                return Some((secret, SecretSource::Keyring));
            }
        }

        std::env::var(name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| (v, SecretSource::Environment))
    }

    /// Returns the secret or a configuration error naming the missing key.
    pub fn require(&self, name: &str) -> Result<String> {
        match self.lookup(name) {
            Some((secret, source)) => {
                debug!(secret = name, ?source, "Resolved secret");
                Ok(secret)
            }
            None => Err(ChatError::config(format!(
                "{name} is not set. Store it in the OS keyring (service '{SERVICE_NAME}') \
                 or export it in the environment / .env file."
            ))),
        }
    }

    fn from_keyring(name: &str) -> Option<String> {
        let entry = match Entry::new(SERVICE_NAME, name) {
            Ok(e) => e,
            Err(e) => {
                debug!("Keyring unavailable: {e}");
                return None;
            }
        };

        match entry.get_password() {
            Ok(secret) => Some(secret),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!("Failed to read {name} from keyring: {e}");
                None
            }
        }
    }

    /// Masks a secret for display, showing only the last 4 characters.
    pub fn mask_secret(secret: &str) -> String {
        let chars: Vec<char> = secret.chars().collect();
        if chars.len() <= 4 {
            "*".repeat(chars.len())
        } else {
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("****...{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret_short() {
        assert_eq!(SecretStore::mask_secret("abc"), "***");
    }

    #[test]
    fn test_mask_secret_long() {
        assert_eq!(
            SecretStore::mask_secret("AIzaSy1234567890abcd"),
            "****...abcd"
        );
    }

    #[test]
    fn test_env_lookup() {
        let name = "CHAT_MYSQL_TEST_SECRET_PRESENT";
        std::env::set_var(name, "value-from-env");

        let store = SecretStore::env_only();
        assert_eq!(
            store.lookup(name),
            Some(("value-from-env".to_string(), SecretSource::Environment))
        );
        assert_eq!(store.require(name).unwrap(), "value-from-env");

        std::env::remove_var(name);
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let name = "CHAT_MYSQL_TEST_SECRET_MISSING";
        std::env::remove_var(name);

        let err = SecretStore::env_only().require(name).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(err.to_string().contains(name));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let name = "CHAT_MYSQL_TEST_SECRET_BLANK";
        std::env::set_var(name, "   ");

        assert!(SecretStore::env_only().lookup(name).is_none());

        std::env::remove_var(name);
    }
}
