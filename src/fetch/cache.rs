// src/fetch/cache.rs
use anyhow::Result;
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::debug;

use super::sheets::SheetsClient;
use super::table::Table;

/// Key for one memoized worksheet: (spreadsheet id, tab index).
pub type TabKey = (String, u32);

struct CacheEntry {
    fetched_at: Instant,
    table: Arc<Table>,
}

/// Time-to-live memoization of worksheet fetches. Within the freshness window
/// a repeated call returns the previously fetched table; after expiry the
/// value is recomputed. Entries are keyed by (spreadsheet id, tab index) so a
/// single cache can serve multiple adapters.
pub struct TabCache {
    ttl: Duration,
    entries: Mutex<HashMap<TabKey, CacheEntry>>,
}

impl TabCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &TabKey) -> Option<Arc<Table>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.table))
    }

    fn store(&self, key: TabKey, table: Arc<Table>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                table,
            },
        );
    }

    /// Return the cached table for `key`, or run `fetch` and memoize its
    /// result. The lock is never held across the fetch; a failed fetch leaves
    /// the cache untouched.
    pub async fn get_or_insert_with<F, Fut>(&self, key: TabKey, fetch: F) -> Result<Arc<Table>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Table>>,
    {
        if let Some(table) = self.lookup(&key) {
            debug!(spreadsheet = %key.0, tab = key.1, "cache hit");
            return Ok(table);
        }
        debug!(spreadsheet = %key.0, tab = key.1, "cache miss");
        let table = Arc::new(fetch().await?);
        self.store(key, Arc::clone(&table));
        Ok(table)
    }

    /// Memoized wrapper around `SheetsClient::fetch_tab`.
    pub async fn get_or_fetch(&self, client: &SheetsClient, index: u32) -> Result<Arc<Table>> {
        let key = (client.spreadsheet_id().to_string(), index);
        self.get_or_insert_with(key, || client.fetch_tab(index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_table() -> Table {
        Table::from_values(vec![
            vec!["date".to_string()],
            vec!["2024-01-01".to_string()],
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn second_call_within_ttl_reuses_the_first_result() -> Result<()> {
        let cache = TabCache::new(Duration::from_secs(600));
        let calls = AtomicUsize::new(0);
        let key = ("sheet".to_string(), 0);

        for _ in 0..3 {
            let table = cache
                .get_or_insert_with(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(tiny_table())
                })
                .await?;
            assert_eq!(table.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn expired_entries_are_recomputed() -> Result<()> {
        let cache = TabCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let key = ("sheet".to_string(), 0);

        for _ in 0..2 {
            cache
                .get_or_insert_with(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(tiny_table())
                })
                .await?;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn distinct_tabs_are_cached_separately() -> Result<()> {
        let cache = TabCache::new(Duration::from_secs(600));
        let calls = AtomicUsize::new(0);

        for tab in [0u32, 1, 0, 1] {
            cache
                .get_or_insert_with(("sheet".to_string(), tab), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(tiny_table())
                })
                .await?;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn failed_fetches_are_not_memoized() -> Result<()> {
        let cache = TabCache::new(Duration::from_secs(600));
        let key = ("sheet".to_string(), 0);

        let first = cache
            .get_or_insert_with(key.clone(), || async { Err(anyhow!("quota exceeded")) })
            .await;
        assert!(first.is_err());

        let second = cache
            .get_or_insert_with(key, || async { Ok(tiny_table()) })
            .await?;
        assert_eq!(second.len(), 1);
        Ok(())
    }
}
