//! Secret handling: ciphertext at rest in the `keys` collection, AES-256-CBC
//! with a process-wide key/IV, and a short-lived plaintext cache.
//!
//! Layout:
//! - `cipher.rs`: the symmetric cipher and its error type
//! - `cache.rs`: TTL cache of decrypted values keyed by secret name
//! - `vault.rs`: store lookup + cache + cipher composed behind `reveal`

pub mod cache;
pub mod cipher;
pub mod vault;

pub use cache::{SECRET_TTL, SecretCache};
pub use cipher::{AesCbcCipher, CipherError, SecretCipher};
pub use vault::{SecretStore, SecretVault};
