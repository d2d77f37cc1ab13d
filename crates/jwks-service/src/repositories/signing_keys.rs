use crate::models::{Freshness, SigningKey};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime, append-only store of signing keys.
///
/// Records are never removed or mutated. Selection is first-match in
/// insertion order, so the earliest inserted key of the requested freshness
/// always wins.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: RwLock<Vec<Arc<SigningKey>>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully built key and return the shared handle to it.
    pub async fn insert(&self, key: SigningKey) -> Arc<SigningKey> {
        let key = Arc::new(key);
        self.keys.write().await.push(Arc::clone(&key));
        key
    }

    /// First key in insertion order whose freshness at `now` matches.
    pub async fn find_first(&self, freshness: Freshness, now: i64) -> Option<Arc<SigningKey>> {
        self.keys
            .read()
            .await
            .iter()
            .find(|key| key.freshness(now) == freshness)
            .cloned()
    }

    /// First key with `expires_at > now`
    pub async fn find_valid(&self, now: i64) -> Option<Arc<SigningKey>> {
        self.find_first(Freshness::Valid, now).await
    }

    /// First key with `expires_at <= now`
    pub async fn find_expired(&self, now: i64) -> Option<Arc<SigningKey>> {
        self.find_first(Freshness::Expired, now).await
    }

    /// All keys valid at `now`, in insertion order.
    pub async fn valid_keys(&self, now: i64) -> Vec<Arc<SigningKey>> {
        self.keys
            .read()
            .await
            .iter()
            .filter(|key| key.is_valid_at(now))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }
}
