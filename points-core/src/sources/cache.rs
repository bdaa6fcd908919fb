//! TTL cache in front of a [`PriceFeed`].

use super::{PriceError, PriceFeed};
use crate::config::ConfigWatcher;
use async_trait::async_trait;
use compact_str::CompactString;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Caches successful price lookups for `ttl`.
///
/// Missing prices and errors are never cached, so a feed outage does not
/// outlive the outage itself.
pub struct CachedPriceFeed<P> {
    inner: P,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<CompactString, (Decimal, Instant)>>>,
}

impl<P: PriceFeed> CachedPriceFeed<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Drop every cached price.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Clear the cache whenever the watched config store is replaced, so a
    /// reload that changes price ids takes effect immediately.
    pub fn spawn_invalidation(&self, mut watcher: ConfigWatcher) -> JoinHandle<()> {
        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            while watcher.changed().await.is_ok() {
                entries.lock().await.clear();
                info!("Price cache cleared after config reload");
            }
        })
    }
}

#[async_trait]
impl<P: PriceFeed> PriceFeed for CachedPriceFeed<P> {
    async fn price_usd(&self, price_id: &str) -> Result<Option<Decimal>, PriceError> {
        if let Some((price, fetched_at)) = self.entries.lock().await.get(price_id).copied() {
            if fetched_at.elapsed() < self.ttl {
                debug!(price_id, "Price cache hit");
                return Ok(Some(price));
            }
        }

        let price = self.inner.price_usd(price_id).await?;
        if let Some(price) = price {
            self.entries
                .lock()
                .await
                .insert(CompactString::from(price_id), (price, Instant::now()));
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingFeed {
        calls: AtomicU32,
        price: Option<Decimal>,
    }

    #[async_trait]
    impl PriceFeed for CountingFeed {
        async fn price_usd(&self, _price_id: &str) -> Result<Option<Decimal>, PriceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.price)
        }
    }

    fn feed(price: Option<Decimal>) -> CachedPriceFeed<CountingFeed> {
        CachedPriceFeed::new(
            CountingFeed {
                calls: AtomicU32::new(0),
                price,
            },
            Duration::from_secs(30),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_hits_until_ttl_expires() {
        let cache = feed(Some(Decimal::new(3000, 0)));
        assert_eq!(cache.price_usd("ethereum").await.unwrap(), Some(Decimal::new(3000, 0)));
        assert_eq!(cache.price_usd("ethereum").await.unwrap(), Some(Decimal::new(3000, 0)));
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        cache.price_usd("ethereum").await.unwrap();
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_price_is_not_cached() {
        let cache = feed(None);
        assert_eq!(cache.price_usd("nothing").await.unwrap(), None);
        assert_eq!(cache.price_usd("nothing").await.unwrap(), None);
        assert_eq!(cache.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_config_reload_clears_cache() {
        let cache = feed(Some(Decimal::ONE));
        let store = ConfigStore::new(0u8);
        let handle = cache.spawn_invalidation(store.subscribe());

        cache.price_usd("usd-coin").await.unwrap();
        assert_eq!(cache.entries.lock().await.len(), 1);

        store.replace(1).await;
        for _ in 0..100 {
            if cache.entries.lock().await.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(cache.entries.lock().await.is_empty());
        handle.abort();
    }
}
