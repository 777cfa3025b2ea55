use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};

use super::cache::SecretCache;
use super::cipher::SecretCipher;
use crate::error::PortfolioError;

/// Source of encrypted secret records.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Ciphertext stored under `name`, or `None` when no record exists.
    async fn get_secret(&self, name: &str) -> Result<Option<String>, PortfolioError>;
}

/// Store + cipher + cache. Plaintext never leaves as anything but `SecretString`.
pub struct SecretVault {
    store: Arc<dyn SecretStore>,
    cipher: Arc<dyn SecretCipher>,
    cache: SecretCache,
}

impl SecretVault {
    pub fn new(
        store: Arc<dyn SecretStore>,
        cipher: Arc<dyn SecretCipher>,
        cache: SecretCache,
    ) -> Self {
        Self {
            store,
            cipher,
            cache,
        }
    }

    /// Decrypt `ciphertext`, serving a cached plaintext for `name` while it is fresh.
    /// Empty plaintexts are returned but never cached.
    pub fn decrypt(&self, name: &str, ciphertext: &str) -> Result<SecretString, PortfolioError> {
        if let Some(hit) = self.cache.get(name) {
            debug!(secret = name, "secret cache hit");
            return Ok(hit);
        }
        let secret = SecretString::from(self.cipher.decrypt(ciphertext)?);
        if !secret.expose_secret().is_empty() {
            self.cache.insert(name, secret.clone());
        }
        Ok(secret)
    }

    /// Look up, decrypt and return a usable secret.
    ///
    /// A missing record or an empty plaintext is `CredentialUnavailable`.
    pub async fn reveal(&self, name: &'static str) -> Result<SecretString, PortfolioError> {
        if let Some(hit) = self.cache.get(name) {
            debug!(secret = name, "secret cache hit");
            return Ok(hit);
        }

        let Some(ciphertext) = self.store.get_secret(name).await? else {
            warn!(secret = name, "secret record not found");
            return Err(PortfolioError::CredentialUnavailable(name));
        };

        let secret = self.decrypt(name, &ciphertext).inspect_err(|e| {
            warn!(secret = name, error = %e, "failed to decrypt secret");
        })?;
        if secret.expose_secret().is_empty() {
            warn!(secret = name, "secret decrypted to an empty value");
            return Err(PortfolioError::CredentialUnavailable(name));
        }
        Ok(secret)
    }
}
