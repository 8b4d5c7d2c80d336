// ── Keyed query cache ──
//
// One `QueryCache<T>` per value type. Entries live in a `DashMap` and
// publish their state through `watch` channels. Concurrent reads of the
// same key share one in-flight future, so the backend sees one request.
// No map guard is ever held across an `.await`.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared, TryFutureExt};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

use super::key::QueryKey;
use super::stream::{QueryState, QueryStream};
use crate::error::CoreError;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<Arc<T>, CoreError>>>;

struct InFlight<T> {
    id: u64,
    /// Invalidation generation the fetch started under.
    generation: u64,
    fetch: SharedFetch<T>,
}

struct Entry<T> {
    state: watch::Sender<QueryState<T>>,
    fetched_at: Option<Instant>,
    /// Set by `invalidate`, cleared only by a fetch that started afterwards
    /// and succeeded.
    invalidated: bool,
    /// Bumped on every invalidation.
    generation: u64,
    in_flight: Option<InFlight<T>>,
}

impl<T: Send + Sync + 'static> Entry<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            state,
            fetched_at: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
        }
    }

    /// Cached data if it may be served without a fetch.
    fn fresh_data(&self, stale_time: Duration) -> Option<Arc<T>> {
        if self.invalidated {
            return None;
        }
        let fetched_at = self.fetched_at?;
        if fetched_at.elapsed() >= stale_time {
            return None;
        }
        self.state.borrow().data.clone()
    }
}

/// A cache of `T` values addressed by [`QueryKey`].
pub struct QueryCache<T: Send + Sync + 'static> {
    entries: DashMap<QueryKey, Entry<T>>,
    stale_time: Duration,
    next_fetch_id: AtomicU64,
}

impl<T: Send + Sync + 'static> QueryCache<T> {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            stale_time,
            next_fetch_id: AtomicU64::new(1),
        }
    }

    /// Read `key`, calling `fetcher` only when there is neither fresh data
    /// nor a fetch already running for it.
    ///
    /// On failure the previous data stays in the entry and the error is
    /// published alongside it.
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<Arc<T>, CoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let (fetch_id, shared) = {
            let mut entry = self.entries.entry(key.clone()).or_insert_with(Entry::new);

            if let Some(data) = entry.fresh_data(self.stale_time) {
                debug!(%key, "query cache hit");
                return Ok(data);
            }

            if let Some(running) = &entry.in_flight {
                debug!(%key, "joining in-flight fetch");
                (running.id, running.fetch.clone())
            } else {
                let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                let running = fetcher().map_ok(Arc::new).boxed().shared();
                entry.in_flight = Some(InFlight {
                    id,
                    generation: entry.generation,
                    fetch: running.clone(),
                });
                entry.state.send_modify(|s| {
                    s.is_fetching = true;
                    s.is_pending = s.data.is_none();
                });
                debug!(%key, "query fetch started");
                (id, running)
            }
        };

        let result = shared.await;
        self.settle(key, fetch_id, &result);
        result
    }

    /// Record the outcome of fetch `fetch_id`. Every awaiter calls this; only
    /// the first one for a still-current fetch has any effect.
    fn settle(&self, key: &QueryKey, fetch_id: u64, result: &Result<Arc<T>, CoreError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return;
        };
        let started_under = match &entry.in_flight {
            Some(running) if running.id == fetch_id => running.generation,
            _ => return,
        };
        entry.in_flight = None;

        match result {
            Ok(data) => {
                entry.fetched_at = Some(Instant::now());
                // An invalidation that landed mid-fetch keeps the entry stale.
                if started_under == entry.generation {
                    entry.invalidated = false;
                }
                let data = Arc::clone(data);
                entry.state.send_modify(|s| {
                    s.data = Some(data);
                    s.error = None;
                    s.is_pending = false;
                    s.is_fetching = false;
                });
            }
            Err(e) => {
                // `invalidated` is left as it was: a failed refetch never
                // makes old data fresh again.
                debug!(%key, error = %e, "query fetch failed");
                let error = e.clone();
                entry.state.send_modify(|s| {
                    s.error = Some(error);
                    s.is_pending = false;
                    s.is_fetching = false;
                });
            }
        }
    }

    /// Mark `key` stale so the next read refetches. Returns `false` if
    /// nothing was cached under it.
    ///
    /// A fetch already running is not cancelled, but its result is stale
    /// as soon as it lands.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.invalidated = true;
                entry.generation = entry.generation.wrapping_add(1);
                debug!(%key, "query invalidated");
                true
            }
            None => false,
        }
    }

    /// Current state of `key` (default state if never read).
    pub fn state(&self, key: &QueryKey) -> QueryState<T> {
        self.entries
            .get(key)
            .map(|entry| entry.state.borrow().clone())
            .unwrap_or_default()
    }

    /// Subscribe to state changes of `key`, creating the entry if needed.
    pub fn subscribe(&self, key: &QueryKey) -> QueryStream<T> {
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::new);
        QueryStream::new(entry.state.subscribe())
    }

    /// All keys with an entry.
    pub fn keys(&self) -> Vec<QueryKey> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }

    /// Whether `key` would be served from cache right now.
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.fresh_data(self.stale_time).is_some())
    }

    /// Drop every entry. Open subscriptions see their channel close.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tokio::sync::Notify;

    use super::*;

    const STALE: Duration = Duration::from_secs(30);

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: u32,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u32, CoreError>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(value) }.boxed()
        }
    }

    #[tokio::test]
    async fn fresh_reads_are_served_from_cache() {
        let cache = QueryCache::<u32>::new(STALE);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::campaigns();

        assert_eq!(*cache.fetch(&key, counting_fetch(&calls, 1)).await.unwrap(), 1);
        assert_eq!(*cache.fetch(&key, counting_fetch(&calls, 2)).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_fresh(&key));
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let cache = Arc::new(QueryCache::<u32>::new(STALE));
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());
        let key = QueryKey::campaigns();

        let mut readers = Vec::new();
        for _ in 0..5 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let gate = Arc::clone(&gate);
            let key = key.clone();
            readers.push(tokio::spawn(async move {
                cache
                    .fetch(&key, move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        async move {
                            gate.notified().await;
                            Ok(7)
                        }
                    })
                    .await
            }));
        }

        // Let every reader register before the fetch is released.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(cache.state(&key).is_pending);
        gate.notify_one();

        for reader in readers {
            assert_eq!(*reader.await.unwrap().unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!cache.state(&key).is_fetching);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = QueryCache::<u32>::new(STALE);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::campaign("c1");

        cache.fetch(&key, counting_fetch(&calls, 1)).await.unwrap();
        assert!(cache.invalidate(&key));
        assert!(!cache.is_fresh(&key));

        assert_eq!(*cache.fetch(&key, counting_fetch(&calls, 2)).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidating_unknown_key_is_a_no_op() {
        let cache = QueryCache::<u32>::new(STALE);
        assert!(!cache.invalidate(&QueryKey::latest_results(10)));
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_go_stale_after_stale_time() {
        let cache = QueryCache::<u32>::new(Duration::from_secs(5));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::campaigns();

        cache.fetch(&key, counting_fetch(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.fetch(&key, counting_fetch(&calls, 2)).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_keeps_previous_data() {
        let cache = QueryCache::<u32>::new(STALE);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::campaigns();

        cache.fetch(&key, counting_fetch(&calls, 3)).await.unwrap();
        cache.invalidate(&key);

        let err = cache
            .fetch(&key, || async { Err(CoreError::Timeout) })
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::Timeout);

        let state = cache.state(&key);
        assert_eq!(state.data.as_deref(), Some(&3));
        assert_eq!(state.error, Some(CoreError::Timeout));
        assert!(!state.is_pending);

        // The failed entry is still stale, so the next read retries.
        cache.fetch(&key, counting_fetch(&calls, 4)).await.unwrap();
        assert!(cache.state(&key).error.is_none());
    }

    #[tokio::test]
    async fn failed_refetch_after_invalidation_stays_stale() {
        let cache = QueryCache::<Vec<&str>>::new(STALE);
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::campaigns();

        cache.fetch(&key, || async { Ok(vec!["X", "Y"]) }).await.unwrap();
        cache.invalidate(&key);
        cache
            .fetch(&key, || async { Err(CoreError::Timeout) })
            .await
            .unwrap_err();
        assert!(!cache.is_fresh(&key));

        let counted = Arc::clone(&calls);
        let data = cache
            .fetch(&key, move || {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Ok(vec!["Y"]) }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*data, vec!["Y"]);
        assert!(cache.is_fresh(&key));
    }

    #[tokio::test]
    async fn invalidation_during_fetch_leaves_entry_stale() {
        let cache = Arc::new(QueryCache::<u32>::new(STALE));
        let gate = Arc::new(Notify::new());
        let key = QueryKey::campaigns();

        let reader = {
            let cache = Arc::clone(&cache);
            let gate = Arc::clone(&gate);
            let key = key.clone();
            tokio::spawn(async move {
                cache
                    .fetch(&key, move || async move {
                        gate.notified().await;
                        Ok(1)
                    })
                    .await
            })
        };

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        cache.invalidate(&key);
        gate.notify_one();
        reader.await.unwrap().unwrap();

        assert!(!cache.is_fresh(&key));
        assert_eq!(cache.state(&key).data.as_deref(), Some(&1));
    }

    #[tokio::test]
    async fn subscribers_see_published_state() {
        let cache = QueryCache::<u32>::new(STALE);
        let key = QueryKey::campaigns();
        let mut stream = cache.subscribe(&key);
        assert!(stream.current().data.is_none());

        let mut changed = tokio_test::task::spawn(stream.changed());
        tokio_test::assert_pending!(changed.poll());
        drop(changed);

        cache.fetch(&key, || async { Ok(9) }).await.unwrap();
        assert_eq!(stream.latest().data.as_deref(), Some(&9));
    }

    #[tokio::test]
    async fn watch_stream_yields_current_then_latest() {
        use futures_util::StreamExt;

        let cache = QueryCache::<u32>::new(STALE);
        let key = QueryKey::campaigns();
        let mut updates = cache.subscribe(&key).into_stream();

        assert!(updates.next().await.unwrap().data.is_none());

        cache.fetch(&key, || async { Ok(5) }).await.unwrap();
        let state = updates.next().await.unwrap();
        assert_eq!(state.data.as_deref(), Some(&5));
        assert!(!state.is_fetching);
    }

    #[tokio::test]
    async fn clear_drops_entries() {
        let cache = QueryCache::<u32>::new(STALE);
        cache
            .fetch(&QueryKey::campaigns(), || async { Ok(1) })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.state(&QueryKey::campaigns()).data.is_none());
    }
}
