//! # Enrichment Cache
//!
//! Per-record labels that need their own `lncli` call (node aliases) are
//! resolved once per key and remembered for the life of the process.
//!
//! ```text
//! lookup(key) ──► cell for key ──► resolved?  ──yes──► label
//!                                     │no
//!                                     ▼
//!                          first caller fetches, others wait on the same cell
//! ```
//!
//! A failed fetch leaves the cell empty, so the next refresh tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use log::debug;
use tokio::sync::OnceCell;

#[derive(Default)]
pub struct EnrichmentCache {
    cells: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, key: &str) -> Arc<OnceCell<String>> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.entry(key.to_string()).or_default().clone()
    }

    /// The label for `key` if it has already been resolved.
    pub fn peek(&self, key: &str) -> Option<String> {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Resolve `key`, calling `fetch` only if no label is cached.
    ///
    /// Concurrent callers for the same key share one fetch.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let cell = self.cell(key);
        let label = cell
            .get_or_try_init(|| {
                debug!("Enrichment miss for {}", key);
                fetch()
            })
            .await?;
        Ok(label.clone())
    }

    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.values().filter(|c| c.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let cache = EnrichmentCache::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let label = cache
                .get_or_fetch("02aa", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("alice".to_string())
                })
                .await
                .unwrap();
            assert_eq!(label, "alice");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek("02aa").as_deref(), Some("alice"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = Arc::new(EnrichmentCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_fetch("03bb", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                            Ok::<_, String>("bob".to_string())
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), "bob");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = EnrichmentCache::new();
        let err = cache
            .get_or_fetch("04cc", || async { Err::<String, _>("offline") })
            .await;
        assert_eq!(err, Err("offline"));
        assert!(cache.peek("04cc").is_none());
        assert!(cache.is_empty());

        let ok = cache
            .get_or_fetch("04cc", || async { Ok::<_, &str>("carol".to_string()) })
            .await;
        assert_eq!(ok.as_deref(), Ok("carol"));
        assert_eq!(cache.len(), 1);
    }
}
