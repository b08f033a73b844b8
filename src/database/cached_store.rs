//! Option cache in front of a settings store
//!
//! Panel renders read options through the cache. A miss loads from the
//! wrapped store and fills the cache only where the key is still absent.
//! A committed submission overwrites the cached values with what it wrote,
//! so a render that loaded a value before that commit can never put the old
//! value back. Cache failures degrade to reads from the wrapped store.

use crate::cache::{keys::option::OptionKey, Cache};
use crate::database::error::DatabaseError;
use crate::database::payment_method_repository::PaymentMethod;
use crate::database::repository::{
    OptionStore, PaymentMethodStore, SettingsStore, SettingsUpdate,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct CachedSettingsStore<S, C> {
    inner: S,
    cache: C,
}

impl<S, C> CachedSettingsStore<S, C>
where
    S: SettingsStore,
    C: Cache + Send + Sync,
{
    pub fn new(inner: S, cache: C) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn cached_options(&self, keys: &[&str]) -> HashMap<String, String> {
        let mut found = HashMap::new();

        for key in keys {
            match self.cache.get::<String>(&OptionKey::new(*key).to_string()).await {
                Ok(Some(value)) => {
                    found.insert((*key).to_string(), value);
                }
                Ok(None) => {}
                Err(e) => {
                    // Redis down: the remaining keys come from the store
                    warn!(error = %e, "Option cache read failed, falling back to database");
                    break;
                }
            }
        }

        found
    }

    async fn fill_missing(&self, values: &HashMap<String, String>) {
        for (key, value) in values {
            let cache_key = OptionKey::new(key.as_str()).to_string();
            match self.cache.set_if_absent(&cache_key, value, None).await {
                Ok(true) => {}
                Ok(false) => debug!(option = %key, "Option cached concurrently, keeping it"),
                Err(e) => {
                    warn!(error = %e, "Failed to cache option value");
                    return;
                }
            }
        }
    }

    async fn write_through(&self, update: &SettingsUpdate) {
        for (key, value) in &update.options {
            let cache_key = OptionKey::new(key.as_str()).to_string();
            if let Err(e) = self.cache.set(&cache_key, value, None).await {
                warn!(error = %e, option = %key, "Failed to refresh cached option");
                if let Err(e) = self.cache.delete(&cache_key).await {
                    warn!(error = %e, option = %key, "Failed to drop cached option");
                }
            }
        }
    }
}

#[async_trait]
impl<S, C> PaymentMethodStore for CachedSettingsStore<S, C>
where
    S: SettingsStore,
    C: Cache + Send + Sync,
{
    async fn find_payment_method(&self, id: i64) -> Result<Option<PaymentMethod>, DatabaseError> {
        self.inner.find_payment_method(id).await
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, DatabaseError> {
        self.inner.list_payment_methods().await
    }
}

#[async_trait]
impl<S, C> OptionStore for CachedSettingsStore<S, C>
where
    S: SettingsStore,
    C: Cache + Send + Sync,
{
    async fn get_option(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut values = self.get_options(&[key]).await?;
        Ok(values.remove(key))
    }

    async fn get_options(&self, keys: &[&str]) -> Result<HashMap<String, String>, DatabaseError> {
        let mut values = self.cached_options(keys).await;
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| !values.contains_key(*k))
            .collect();

        if missing.is_empty() {
            debug!(keys = keys.len(), "All options served from cache");
            return Ok(values);
        }

        let loaded = self.inner.get_options(&missing).await?;
        self.fill_missing(&loaded).await;
        values.extend(loaded);
        Ok(values)
    }
}

#[async_trait]
impl<S, C> SettingsStore for CachedSettingsStore<S, C>
where
    S: SettingsStore,
    C: Cache + Send + Sync,
{
    async fn apply_update(&self, update: &SettingsUpdate) -> Result<PaymentMethod, DatabaseError> {
        let method = self.inner.apply_update(update).await?;
        self.write_through(update).await;
        Ok(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult};
    use crate::database::memory::InMemorySettingsStore;
    use serde::de::DeserializeOwned;
    use serde::Serialize;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// JSON payloads in a map, like Redis would hold them
    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, String>>,
        down: AtomicBool,
    }

    impl MemoryCache {
        fn raw(&self, key: &str) -> Option<String> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        fn check(&self) -> CacheResult<()> {
            if self.down.load(Ordering::SeqCst) {
                return Err(CacheError::ConnectionError("connection refused".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MemoryCache {
        async fn get<T>(&self, key: &str) -> CacheResult<Option<T>>
        where
            T: DeserializeOwned + Send,
        {
            self.check()?;
            let raw = self.raw(key);
            Ok(raw.map(|p| serde_json::from_str(&p)).transpose()?)
        }

        async fn set<T>(&self, key: &str, value: &T, _ttl: Option<Duration>) -> CacheResult<()>
        where
            T: Serialize + Sync,
        {
            self.check()?;
            let payload = serde_json::to_string(value)?;
            self.entries.lock().unwrap().insert(key.to_string(), payload);
            Ok(())
        }

        async fn set_if_absent<T>(
            &self,
            key: &str,
            value: &T,
            _ttl: Option<Duration>,
        ) -> CacheResult<bool>
        where
            T: Serialize + Sync,
        {
            self.check()?;
            let payload = serde_json::to_string(value)?;
            let mut entries = self.entries.lock().unwrap();
            if entries.contains_key(key) {
                return Ok(false);
            }
            entries.insert(key.to_string(), payload);
            Ok(true)
        }

        async fn delete(&self, key: &str) -> CacheResult<bool> {
            self.check()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }
    }

    /// Holds the first option read after loading it, until released
    struct SlowReadStore {
        inner: InMemorySettingsStore,
        hold_next_read: AtomicBool,
        loaded: Notify,
        release: Notify,
    }

    impl SlowReadStore {
        fn new(inner: InMemorySettingsStore) -> Self {
            Self {
                inner,
                hold_next_read: AtomicBool::new(true),
                loaded: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl PaymentMethodStore for SlowReadStore {
        async fn find_payment_method(
            &self,
            id: i64,
        ) -> Result<Option<PaymentMethod>, DatabaseError> {
            self.inner.find_payment_method(id).await
        }

        async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, DatabaseError> {
            self.inner.list_payment_methods().await
        }
    }

    #[async_trait]
    impl OptionStore for SlowReadStore {
        async fn get_option(&self, key: &str) -> Result<Option<String>, DatabaseError> {
            self.inner.get_option(key).await
        }

        async fn get_options(
            &self,
            keys: &[&str],
        ) -> Result<HashMap<String, String>, DatabaseError> {
            let values = self.inner.get_options(keys).await?;
            if self.hold_next_read.swap(false, Ordering::SeqCst) {
                self.loaded.notify_one();
                self.release.notified().await;
            }
            Ok(values)
        }
    }

    #[async_trait]
    impl SettingsStore for SlowReadStore {
        async fn apply_update(
            &self,
            update: &SettingsUpdate,
        ) -> Result<PaymentMethod, DatabaseError> {
            self.inner.apply_update(update).await
        }
    }

    fn stripe_store() -> InMemorySettingsStore {
        InMemorySettingsStore::new()
            .with_method(PaymentMethod {
                id: 1,
                title: "Card".to_string(),
                folder: "stripe".to_string(),
                installed: true,
            })
            .with_option("stripe_secret_key", "sk_old")
    }

    fn secret_update(value: &str) -> SettingsUpdate {
        let mut update = SettingsUpdate::new(1);
        update
            .options
            .insert("stripe_secret_key".to_string(), value.to_string());
        update
    }

    #[tokio::test]
    async fn test_render_loaded_before_commit_does_not_restore_old_value() {
        let store = CachedSettingsStore::new(
            SlowReadStore::new(stripe_store()),
            MemoryCache::default(),
        );

        let render = store.get_option("stripe_secret_key");
        let commit = async {
            store.inner().loaded.notified().await;
            let saved = store.apply_update(&secret_update("sk_new")).await;
            store.inner().release.notify_one();
            saved
        };
        let (rendered, saved) = tokio::join!(render, commit);

        // the render read before the commit
        assert_eq!(rendered.unwrap().as_deref(), Some("sk_old"));
        assert!(saved.is_ok());

        assert_eq!(
            store.cache.raw("v1:option:stripe_secret_key").as_deref(),
            Some("\"sk_new\"")
        );
        assert_eq!(
            store.get_option("stripe_secret_key").await.unwrap().as_deref(),
            Some("sk_new")
        );
    }

    #[tokio::test]
    async fn test_miss_fills_and_hit_skips_store() {
        let store = CachedSettingsStore::new(stripe_store(), MemoryCache::default());

        assert_eq!(
            store.get_option("stripe_secret_key").await.unwrap().as_deref(),
            Some("sk_old")
        );
        assert_eq!(
            store.cache.raw("v1:option:stripe_secret_key").as_deref(),
            Some("\"sk_old\"")
        );

        // a value only the cache knows proves the store was not asked
        store
            .cache
            .set("v1:option:stripe_publishable_key", &"pk_cached", None)
            .await
            .unwrap();
        let values = store
            .get_options(&["stripe_secret_key", "stripe_publishable_key"])
            .await
            .unwrap();
        assert_eq!(values["stripe_publishable_key"], "pk_cached");
    }

    #[tokio::test]
    async fn test_cache_down_reads_and_writes_through_store() {
        let store = CachedSettingsStore::new(stripe_store(), MemoryCache::default());
        store.cache.down.store(true, Ordering::SeqCst);

        assert_eq!(
            store.get_option("stripe_secret_key").await.unwrap().as_deref(),
            Some("sk_old")
        );

        store.apply_update(&secret_update("sk_new")).await.unwrap();
        assert_eq!(
            store.inner().get_option("stripe_secret_key").await.unwrap().as_deref(),
            Some("sk_new")
        );
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cache_alone() {
        let store = CachedSettingsStore::new(stripe_store(), MemoryCache::default());
        store.get_option("stripe_secret_key").await.unwrap();

        let mut update = secret_update("sk_new");
        update.method_id = 99;
        assert!(store.apply_update(&update).await.is_err());

        assert_eq!(
            store.cache.raw("v1:option:stripe_secret_key").as_deref(),
            Some("\"sk_old\"")
        );
    }
}
