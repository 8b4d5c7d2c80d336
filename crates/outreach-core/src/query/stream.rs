// ── Reactive query subscriptions ──
//
// Views hold a `QueryStream` per key and re-render whenever the cache
// publishes a new `QueryState`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::CoreError;

/// Observable state of one cached read.
#[derive(Debug)]
pub struct QueryState<T> {
    /// Last successfully fetched value. Kept across later failures.
    pub data: Option<Arc<T>>,
    /// A fetch is running and there is no data to show yet.
    pub is_pending: bool,
    /// A fetch is running (with or without data already present).
    pub is_fetching: bool,
    /// Failure of the most recent fetch, cleared by the next success.
    pub error: Option<CoreError>,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_pending: self.is_pending,
            is_fetching: self.is_fetching,
            error: self.error.clone(),
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_pending: false,
            is_fetching: false,
            error: None,
        }
    }
}

/// A subscription to one query key.
pub struct QueryStream<T: Send + Sync + 'static> {
    current: QueryState<T>,
    receiver: watch::Receiver<QueryState<T>>,
}

impl<T: Send + Sync + 'static> QueryStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<QueryState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// State captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &QueryState<T> {
        &self.current
    }

    /// Latest published state.
    pub fn latest(&self) -> QueryState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the cache entry is gone.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> QueryWatchStream<T> {
        QueryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct QueryWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<QueryState<T>>,
}

impl<T: Send + Sync + 'static> Stream for QueryWatchStream<T> {
    type Item = QueryState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
