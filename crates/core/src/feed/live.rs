//! The live view: one subscription, one current state, one published output.
//!
//! Every accepted change (snapshot, view config, goals, scope) replaces the
//! state value whole and recomputes under the same lock, so an output never
//! mixes halves of two states. Snapshots carry the generation they were
//! subscribed under; anything older than the current generation is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tokio::sync::watch;

use super::error::FeedError;
use super::source::{AccessGrant, RangeQuery, Scope, Subscription, TransactionSource};
use crate::aggregate::{AggregateResult, Aggregator};
use crate::goals::Goals;
use crate::transaction::Transaction;
use crate::view::ViewConfig;

/// Result a source hands to a sink.
pub type SnapshotResult = Result<Vec<Transaction>, FeedError>;

/// Render-ready output of one recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewOutput {
    /// Generation the snapshot belongs to.
    pub generation: u64,
    /// Scope the rows came from, `None` before the first switch.
    pub scope: Option<Scope>,
    /// Filtered and sorted rows.
    pub rows: Vec<Transaction>,
    /// Aggregation over `rows`.
    pub aggregate: AggregateResult,
}

/// What happened to a delivered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Snapshot replaced the state and a new output was published.
    Applied,
    /// Failure recorded; the last output stays.
    Recorded,
    /// Superseded generation; ignored.
    Stale,
    /// The view no longer exists.
    Detached,
}

#[derive(Debug, Clone)]
struct ViewState {
    snapshot: Arc<Vec<Transaction>>,
    view: ViewConfig,
    goals: Goals,
}

struct Shared {
    generation: u64,
    scope: Option<Scope>,
    state: Arc<ViewState>,
    last_error: Option<FeedError>,
}

struct Inner {
    shared: Mutex<Shared>,
    subscription: Mutex<Option<Box<dyn Subscription>>>,
    aggregator: Aggregator,
    source: Arc<dyn TransactionSource>,
    output: watch::Sender<Arc<ViewOutput>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn compute(aggregator: &Aggregator, shared: &Shared) -> ViewOutput {
    let state = &shared.state;
    let (rows, aggregate) = aggregator.run(&state.snapshot, &state.goals, &state.view);
    ViewOutput {
        generation: shared.generation,
        scope: shared.scope.clone(),
        rows,
        aggregate,
    }
}

impl Inner {
    fn publish(&self, shared: &Shared) {
        let output = compute(&self.aggregator, shared);
        tracing::debug!(
            generation = shared.generation,
            rows = output.rows.len(),
            "published view output"
        );
        self.output.send_replace(Arc::new(output));
    }

    /// Cancels the current subscription and subscribes for `generation`.
    fn resubscribe(
        self: &Arc<Self>,
        scope: &Scope,
        query: &RangeQuery,
        generation: u64,
    ) -> Result<(), FeedError> {
        let previous = lock(&self.subscription).take();
        if let Some(mut previous) = previous {
            previous.cancel();
        }

        let sink = SnapshotSink {
            inner: Arc::downgrade(self),
            generation,
        };
        let subscription = match self.source.subscribe(scope, query, sink) {
            Ok(subscription) => subscription,
            Err(err) => {
                tracing::warn!(%scope, generation, error = %err, "subscribe failed");
                let mut shared = lock(&self.shared);
                if shared.generation == generation {
                    shared.last_error = Some(err.clone());
                }
                return Err(err);
            }
        };

        let mut slot = lock(&self.subscription);
        let current = lock(&self.shared).generation == generation;
        let stale = if current {
            slot.replace(subscription)
        } else {
            Some(subscription)
        };
        drop(slot);

        if let Some(mut stale) = stale {
            tracing::debug!(generation, "cancelled superseded subscription");
            stale.cancel();
        }
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let slot = self
            .subscription
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(mut subscription) = slot.take() {
            subscription.cancel();
        }
    }
}

/// Where a source delivers snapshots for one generation.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
    inner: Weak<Inner>,
    generation: u64,
}

impl SnapshotSink {
    /// Generation this sink was created for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Hands a snapshot or a failure to the view.
    pub fn deliver(&self, result: SnapshotResult) -> Delivery {
        let Some(inner) = self.inner.upgrade() else {
            return Delivery::Detached;
        };
        let mut shared = lock(&inner.shared);
        if shared.generation != self.generation {
            tracing::debug!(
                stale = self.generation,
                current = shared.generation,
                "dropped stale snapshot"
            );
            return Delivery::Stale;
        }

        match result {
            Ok(snapshot) => {
                shared.last_error = None;
                shared.state = Arc::new(ViewState {
                    snapshot: Arc::new(snapshot),
                    ..ViewState::clone(&shared.state)
                });
                inner.publish(&shared);
                Delivery::Applied
            }
            Err(err) => {
                tracing::warn!(
                    generation = self.generation,
                    error = %err,
                    "snapshot delivery failed, keeping last output"
                );
                shared.last_error = Some(err);
                Delivery::Recorded
            }
        }
    }
}

/// A live, always-current derived view over one transaction scope.
pub struct LiveView {
    inner: Arc<Inner>,
}

impl LiveView {
    /// Creates a view with no scope and an empty snapshot.
    #[must_use]
    pub fn new(source: Arc<dyn TransactionSource>, aggregator: Aggregator, view: ViewConfig) -> Self {
        let shared = Shared {
            generation: 0,
            scope: None,
            state: Arc::new(ViewState {
                snapshot: Arc::default(),
                view,
                goals: Goals::default(),
            }),
            last_error: None,
        };
        let output = watch::Sender::new(Arc::new(compute(&aggregator, &shared)));

        Self {
            inner: Arc::new(Inner {
                shared: Mutex::new(shared),
                subscription: Mutex::new(None),
                aggregator,
                source,
                output,
            }),
        }
    }

    /// Switches to `scope` if the grant allows it.
    ///
    /// The previous generation is invalidated before its subscription is
    /// cancelled, so nothing it delivers afterwards is applied. The snapshot
    /// is cleared before the new subscription starts.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::PermissionDenied` without touching the current
    /// state, or the source's error if subscribing fails.
    pub fn switch_scope(&self, grant: &AccessGrant, scope: Scope) -> Result<u64, FeedError> {
        if let Err(err) = grant.authorize(&scope) {
            tracing::warn!(%scope, error = %err, "scope switch denied");
            return Err(err);
        }

        let (generation, query) = {
            let mut shared = lock(&self.inner.shared);
            shared.generation += 1;
            shared.scope = Some(scope.clone());
            shared.last_error = None;
            shared.state = Arc::new(ViewState {
                snapshot: Arc::default(),
                ..ViewState::clone(&shared.state)
            });
            self.inner.publish(&shared);
            (shared.generation, RangeQuery::for_view(&shared.state.view))
        };
        tracing::info!(%scope, generation, "switched scope");

        self.inner.resubscribe(&scope, &query, generation)?;
        Ok(generation)
    }

    /// Replaces the view config and recomputes.
    ///
    /// A change to the range or status filter re-queries the source; the
    /// current snapshot stays visible until the new one arrives.
    ///
    /// # Errors
    ///
    /// Returns the source's error if re-subscribing fails.
    pub fn set_view(&self, view: ViewConfig) -> Result<(), FeedError> {
        let query = RangeQuery::for_view(&view);
        let resubscribe = {
            let mut shared = lock(&self.inner.shared);
            let changed = RangeQuery::for_view(&shared.state.view) != query;
            shared.state = Arc::new(ViewState {
                view,
                ..ViewState::clone(&shared.state)
            });
            let resubscribe = match (shared.scope.clone(), changed) {
                (Some(scope), true) => {
                    shared.generation += 1;
                    Some((scope, shared.generation))
                }
                _ => None,
            };
            self.inner.publish(&shared);
            resubscribe
        };

        if let Some((scope, generation)) = resubscribe {
            tracing::debug!(%scope, generation, "view query changed, re-subscribing");
            self.inner.resubscribe(&scope, &query, generation)?;
        }
        Ok(())
    }

    /// Replaces the goal map and recomputes.
    pub fn set_goals(&self, goals: Goals) {
        let mut shared = lock(&self.inner.shared);
        shared.state = Arc::new(ViewState {
            goals,
            ..ViewState::clone(&shared.state)
        });
        self.inner.publish(&shared);
    }

    /// Drops the scope, cancels the subscription and clears the snapshot.
    pub fn cancel(&self) {
        {
            let mut shared = lock(&self.inner.shared);
            shared.generation += 1;
            shared.scope = None;
            shared.state = Arc::new(ViewState {
                snapshot: Arc::default(),
                ..ViewState::clone(&shared.state)
            });
            self.inner.publish(&shared);
        }
        let previous = lock(&self.inner.subscription).take();
        if let Some(mut previous) = previous {
            previous.cancel();
        }
        tracing::info!("live view cancelled");
    }

    /// Latest published output.
    #[must_use]
    pub fn current(&self) -> Arc<ViewOutput> {
        Arc::clone(&self.inner.output.borrow())
    }

    /// Receiver notified on every published output.
    #[must_use]
    pub fn subscribe_outputs(&self) -> watch::Receiver<Arc<ViewOutput>> {
        self.inner.output.subscribe()
    }

    /// Last failure of the current generation.
    #[must_use]
    pub fn last_error(&self) -> Option<FeedError> {
        lock(&self.inner.shared).last_error.clone()
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        lock(&self.inner.shared).generation
    }

    /// Current scope.
    #[must_use]
    pub fn scope(&self) -> Option<Scope> {
        lock(&self.inner.shared).scope.clone()
    }

    /// Whether a subscription is active.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        lock(&self.inner.subscription).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::channel::spawn_forwarder;
    use crate::feed::memory::InMemorySource;
    use crate::period::YearMonth;
    use crate::transaction::TransactionType;
    use crate::view::{SortColumn, SortSpec, StatusMode};
    use fluxo_shared::types::{GroupId, UserId};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct ManualSource {
        sinks: Mutex<Vec<SnapshotSink>>,
        cancelled: Arc<AtomicUsize>,
    }

    impl ManualSource {
        fn sink(&self, index: usize) -> SnapshotSink {
            lock(&self.sinks)[index].clone()
        }
    }

    struct CountingSubscription(Arc<AtomicUsize>);

    impl Subscription for CountingSubscription {
        fn cancel(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl TransactionSource for ManualSource {
        fn subscribe(
            &self,
            _scope: &Scope,
            _query: &RangeQuery,
            sink: SnapshotSink,
        ) -> Result<Box<dyn Subscription>, FeedError> {
            lock(&self.sinks).push(sink);
            Ok(Box::new(CountingSubscription(Arc::clone(&self.cancelled))))
        }
    }

    fn me() -> UserId {
        UserId::new("me")
    }

    fn personal() -> Scope {
        Scope::Personal(me())
    }

    fn family() -> Scope {
        Scope::Group(GroupId::new("family"))
    }

    fn january() -> ViewConfig {
        ViewConfig::for_months(YearMonth::new(2026, 1).unwrap(), None).unwrap()
    }

    fn february() -> ViewConfig {
        ViewConfig::for_months(YearMonth::new(2026, 2).unwrap(), None).unwrap()
    }

    fn snapshot() -> Vec<Transaction> {
        vec![
            Transaction::new("salary", "2026-01-05", TransactionType::Income, dec!(1000)),
            Transaction::new("market", "2026-01-10", TransactionType::Expense, dec!(300))
                .with_category("food"),
            Transaction::new("rent", "2026-01-12", TransactionType::Expense, dec!(500)).pending(),
            Transaction::new("gym", "2026-02-03", TransactionType::Expense, dec!(80)),
        ]
    }

    fn memory_view() -> (Arc<InMemorySource>, LiveView) {
        let source = Arc::new(InMemorySource::new());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        (source, view)
    }

    #[test]
    fn test_initial_output_is_empty() {
        let (_, view) = memory_view();
        let output = view.current();
        assert_eq!(output.generation, 0);
        assert!(output.scope.is_none());
        assert!(output.rows.is_empty());
        assert_eq!(output.aggregate.net_balance, dec!(0));
        assert!(!view.is_subscribed());
    }

    #[test]
    fn test_switch_scope_applies_query_and_view() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());

        let generation = view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let output = view.current();

        assert_eq!(generation, 1);
        assert_eq!(output.generation, 1);
        assert_eq!(output.scope, Some(personal()));
        let ids: Vec<&str> = output.rows.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["salary", "market"]);
        assert_eq!(output.aggregate.total_income, dec!(1000));
        assert_eq!(output.aggregate.total_expense, dec!(300));
        assert!(view.is_subscribed());
    }

    #[test]
    fn test_scope_switch_clears_previous_data() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        view.switch_scope(&AccessGrant::allow(me()), family()).unwrap();
        let output = view.current();
        assert_eq!(output.scope, Some(family()));
        assert!(output.rows.is_empty());
        assert_eq!(source.active_subscriptions(), 1);

        // A late update to the old scope must not reach the view.
        source.publish(&personal(), snapshot());
        assert!(view.current().rows.is_empty());
    }

    #[test]
    fn test_stale_generation_dropped() {
        let source = Arc::new(ManualSource::default());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        let grant = AccessGrant::allow(me());

        view.switch_scope(&grant, personal()).unwrap();
        view.switch_scope(&grant, family()).unwrap();
        assert_eq!(source.cancelled.load(Ordering::SeqCst), 1);

        let stale = source.sink(0);
        let fresh = source.sink(1);
        assert_eq!(stale.deliver(Ok(snapshot())), Delivery::Stale);
        assert!(view.current().rows.is_empty());

        assert_eq!(fresh.deliver(Ok(snapshot())), Delivery::Applied);
        assert_eq!(view.current().rows.len(), 2);
        assert_eq!(view.current().generation, 2);
    }

    #[test]
    fn test_last_snapshot_wins() {
        let source = Arc::new(ManualSource::default());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let sink = source.sink(0);

        sink.deliver(Ok(snapshot()));
        sink.deliver(Ok(vec![Transaction::new(
            "only",
            "2026-01-20",
            TransactionType::Income,
            dec!(5),
        )]));

        let output = view.current();
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.aggregate.total_income, dec!(5));
        assert_eq!(output.aggregate.total_expense, dec!(0));
    }

    #[test]
    fn test_denied_switch_keeps_state() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let before = view.current();

        let err = view
            .switch_scope(&AccessGrant::allow(me()), Scope::Personal(UserId::new("other")))
            .unwrap_err();
        assert!(matches!(err, FeedError::PermissionDenied(_)));
        assert_eq!(view.generation(), 1);
        assert_eq!(view.scope(), Some(personal()));
        assert_eq!(view.current(), before);
        assert_eq!(source.active_subscriptions(), 1);

        let signed_out = AccessGrant {
            user_id: me(),
            allowed: false,
        };
        assert!(view.switch_scope(&signed_out, family()).is_err());
        assert_eq!(view.current(), before);
    }

    #[test]
    fn test_failure_keeps_last_output() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let before = view.current();

        source.fail(&personal(), &FeedError::unavailable("timeout"));

        assert_eq!(view.current(), before);
        assert_eq!(view.last_error(), Some(FeedError::unavailable("timeout")));

        source.publish(&personal(), snapshot());
        assert_eq!(view.last_error(), None);
    }

    #[test]
    fn test_subscribe_failure_is_recorded() {
        let (source, view) = memory_view();
        source.set_offline(true);

        let err = view
            .switch_scope(&AccessGrant::allow(me()), personal())
            .unwrap_err();
        assert!(matches!(err, FeedError::Unavailable(_)));
        assert_eq!(view.last_error(), Some(err));
        assert!(!view.is_subscribed());
    }

    #[test]
    fn test_range_change_requeries_source() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        view.set_view(february()).unwrap();
        let output = view.current();
        assert_eq!(view.generation(), 2);
        assert_eq!(output.rows.len(), 1);
        assert_eq!(output.rows[0].id.as_str(), "gym");
        assert_eq!(source.active_subscriptions(), 1);
    }

    #[test]
    fn test_local_view_change_keeps_subscription() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        let sorted = january().with_sort(SortSpec::descending(SortColumn::Value));
        view.set_view(sorted).unwrap();
        assert_eq!(view.generation(), 1);
        assert_eq!(view.current().rows[0].id.as_str(), "salary");

        view.set_view(january().with_status_mode(StatusMode::All)).unwrap();
        assert_eq!(view.generation(), 2);
        assert_eq!(view.current().rows.len(), 3);
    }

    #[test]
    fn test_set_goals_recomputes() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        let mut goals = Goals::new();
        goals.insert("food", dec!(400)).unwrap();
        view.set_goals(goals);

        let progress = &view.current().aggregate.goal_progress;
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent, dec!(300));
        assert_eq!(progress[0].percent, dec!(75));
    }

    #[test]
    fn test_publish_pushes_live_update() {
        let (source, view) = memory_view();
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        assert!(view.current().rows.is_empty());

        source.publish(&personal(), snapshot());
        assert_eq!(view.current().rows.len(), 2);
    }

    #[test]
    fn test_cancel_clears_scope() {
        let (source, view) = memory_view();
        source.publish(&personal(), snapshot());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        view.cancel();
        assert!(view.scope().is_none());
        assert!(view.current().rows.is_empty());
        assert!(!view.is_subscribed());
        assert_eq!(source.active_subscriptions(), 0);
    }

    #[test]
    fn test_dropped_view_detaches_sink() {
        let source = Arc::new(ManualSource::default());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let sink = source.sink(0);

        drop(view);
        assert_eq!(source.cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(sink.deliver(Ok(snapshot())), Delivery::Detached);
    }

    #[tokio::test]
    async fn test_forwarder_delivers_and_reports_close() {
        let source = Arc::new(ManualSource::default());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();
        let mut outputs = view.subscribe_outputs();

        let (tx, rx) = mpsc::channel(4);
        let forwarder = spawn_forwarder(rx, source.sink(0));

        tx.send(Ok(snapshot())).await.unwrap();
        outputs.changed().await.unwrap();
        assert_eq!(outputs.borrow_and_update().rows.len(), 2);

        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), async {
            while !forwarder.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(view.last_error(), Some(FeedError::Closed));
        assert_eq!(view.current().rows.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_forwarder_stops_delivering() {
        let source = Arc::new(ManualSource::default());
        let view = LiveView::new(source.clone(), Aggregator::default(), january());
        view.switch_scope(&AccessGrant::allow(me()), personal()).unwrap();

        let (tx, rx) = mpsc::channel(4);
        let mut forwarder = spawn_forwarder(rx, source.sink(0));
        forwarder.cancel();
        tokio::time::timeout(Duration::from_secs(1), async {
            while !forwarder.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(tx.send(Ok(snapshot())).await.is_err());
        assert!(view.current().rows.is_empty());
    }
}
