//! Key-value cache stores backing the news and background-art caches.
//!
//! One slot per key, last writer wins. `MemoryStore` is the per-process
//! ephemeral store (and the test fake); `RedisStore` is the durable one.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub mod memory;
pub mod redis_store;

pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

/// Durable slot holding the serialized `NewsCacheEntry`.
pub const NEWS_CACHE_KEY: &str = "TECH_NEWS_CACHE";
/// Ephemeral slot holding a JSON array of background data URIs.
pub const BG_ASSETS_KEY: &str = "TECH_BG_ASSETS";
/// Ephemeral flag that short-circuits background generation.
pub const BG_DISABLED_KEY: &str = "TECH_BG_DISABLED";

const FLAG_VALUE: &str = "true";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn has_flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.as_deref() == Some(FLAG_VALUE))
    }

    async fn set_flag(&self, key: &str) -> Result<(), StoreError> {
        self.set(key, FLAG_VALUE.to_string()).await
    }
}

/// Reads and deserializes a JSON value. A missing key is `Ok(None)`.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_string(value)?).await
}
