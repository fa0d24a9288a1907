//! In-process transaction source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::FeedError;
use super::live::SnapshotSink;
use super::source::{RangeQuery, Scope, Subscription, TransactionSource};
use crate::transaction::Transaction;

struct Listener {
    scope: Scope,
    query: RangeQuery,
    sink: SnapshotSink,
    active: Arc<AtomicBool>,
}

impl Listener {
    fn push(&self, all: &[Transaction]) {
        let matching = all
            .iter()
            .filter(|tx| self.query.matches(tx))
            .cloned()
            .collect();
        self.sink.deliver(Ok(matching));
    }
}

#[derive(Default)]
struct Store {
    collections: HashMap<Scope, Vec<Transaction>>,
    listeners: Vec<Listener>,
    offline: bool,
}

/// A source backed by in-memory collections.
///
/// Applies the range and status query before delivering, the way a document
/// store would server-side. Every `publish` pushes to live subscribers of
/// the scope.
#[derive(Default)]
pub struct InMemorySource {
    store: Mutex<Store>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the collection for `scope` and notifies its subscribers.
    pub fn publish(&self, scope: &Scope, transactions: Vec<Transaction>) {
        let mut store = self.store();
        store.listeners.retain(|l| l.active.load(Ordering::Acquire));
        store.collections.insert(scope.clone(), transactions);

        let Store {
            collections,
            listeners,
            ..
        } = &*store;
        let all = collections.get(scope).map_or(&[][..], Vec::as_slice);
        let mut notified = 0;
        for listener in listeners.iter().filter(|l| l.scope == *scope) {
            if listener.active.load(Ordering::Acquire) {
                listener.push(all);
                notified += 1;
            }
        }
        tracing::debug!(%scope, records = all.len(), notified, "published collection");
    }

    /// Delivers `error` to every live subscriber of `scope`.
    pub fn fail(&self, scope: &Scope, error: &FeedError) {
        let store = self.store();
        for listener in store
            .listeners
            .iter()
            .filter(|l| l.scope == *scope && l.active.load(Ordering::Acquire))
        {
            listener.sink.deliver(Err(error.clone()));
        }
    }

    /// Makes new subscriptions fail, as an unreachable store would.
    pub fn set_offline(&self, offline: bool) {
        self.store().offline = offline;
    }

    /// Number of subscriptions that have not been cancelled.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.store()
            .listeners
            .iter()
            .filter(|l| l.active.load(Ordering::Acquire))
            .count()
    }
}

impl TransactionSource for InMemorySource {
    fn subscribe(
        &self,
        scope: &Scope,
        query: &RangeQuery,
        sink: SnapshotSink,
    ) -> Result<Box<dyn Subscription>, FeedError> {
        let mut store = self.store();
        if store.offline {
            return Err(FeedError::unavailable(format!("{scope} is unreachable")));
        }

        let active = Arc::new(AtomicBool::new(true));
        let listener = Listener {
            scope: scope.clone(),
            query: query.clone(),
            sink,
            active: Arc::clone(&active),
        };
        let initial = store.collections.get(scope).map_or(&[][..], Vec::as_slice);
        listener.push(initial);
        store.listeners.push(listener);

        Ok(Box::new(MemorySubscription { active }))
    }
}

/// Subscription handle of [`InMemorySource`].
struct MemorySubscription {
    active: Arc<AtomicBool>,
}

impl Subscription for MemorySubscription {
    fn cancel(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
