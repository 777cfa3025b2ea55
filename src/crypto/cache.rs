use dashmap::DashMap;
use secrecy::SecretString;
use std::time::Duration;
use tokio::time::Instant;

/// How long a decrypted secret stays cached.
pub const SECRET_TTL: Duration = Duration::from_secs(5 * 60);

/// In-memory TTL map of decrypted secrets keyed by secret name.
///
/// Entries live only in process memory; expired entries are dropped lazily on lookup.
pub struct SecretCache {
    ttl: Duration,
    entries: DashMap<String, CachedSecret>,
}

struct CachedSecret {
    value: SecretString,
    expires_at: Instant,
}

impl SecretCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<SecretString> {
        let now = Instant::now();
        {
            let entry = self.entries.get(name)?;
            if entry.expires_at > now {
                return Some(entry.value.clone());
            }
        }
        self.entries
            .remove_if(name, |_, entry| entry.expires_at <= now);
        None
    }

    pub fn insert(&self, name: &str, value: SecretString) {
        self.entries.insert(
            name.to_string(),
            CachedSecret {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SecretCache {
    fn default() -> Self {
        Self::new(SECRET_TTL)
    }
}
