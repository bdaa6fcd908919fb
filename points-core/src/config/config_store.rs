//! Hot-swappable configuration with change notification.
//!
//! `ConfigStore<T>` keeps the current value behind an `Arc` so readers take a
//! cheap snapshot and never hold a lock across an `.await`. Replacing the
//! value bumps a version counter that subscribers can wait on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, watch};

/// A shared, versioned configuration store.
pub struct ConfigStore<T> {
    inner: Arc<ConfigStoreInner<T>>,
}

struct ConfigStoreInner<T> {
    current: RwLock<Arc<T>>,
    version: AtomicU64,
    version_tx: watch::Sender<u64>,
}

/// Receives notifications when a [`ConfigStore`] is replaced.
pub struct ConfigWatcher {
    version_rx: watch::Receiver<u64>,
}

impl<T> ConfigStore<T> {
    pub fn new(initial: T) -> Self {
        let (version_tx, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(ConfigStoreInner {
                current: RwLock::new(Arc::new(initial)),
                version: AtomicU64::new(0),
                version_tx,
            }),
        }
    }

    /// Snapshot of the current value.
    ///
    /// The snapshot stays valid (and unchanged) even if the store is
    /// replaced while the caller is still using it.
    pub async fn load(&self) -> Arc<T> {
        Arc::clone(&*self.inner.current.read().await)
    }

    /// Replace the stored value and notify all watchers.
    pub async fn replace(&self, value: T) {
        let mut guard = self.inner.current.write().await;
        *guard = Arc::new(value);
        let new_version = self.inner.version.fetch_add(1, Ordering::Relaxed) + 1;
        // Release the write lock first so woken subscribers can load at once.
        drop(guard);
        let _ = self.inner.version_tx.send(new_version);
    }

    /// Number of replacements since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> ConfigWatcher {
        ConfigWatcher {
            version_rx: self.inner.version_tx.subscribe(),
        }
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ConfigWatcher {
    /// Wait until the store is replaced.
    ///
    /// Returns `Err` once the [`ConfigStore`] has been dropped.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.version_rx.changed().await
    }
}
