//! A channel-backed source over transactions loaded from disk.

use std::sync::Arc;

use fluxo_core::feed::{
    FeedError, RangeQuery, Scope, SnapshotResult, SnapshotSink, Subscription, TransactionSource,
    spawn_forwarder,
};
use fluxo_core::transaction::Transaction;
use tokio::sync::mpsc;

/// Serves one loaded collection to every scope, the way a remote store
/// would: the query runs on the producer side and snapshots arrive over a
/// bounded channel.
pub struct LoadedSource {
    transactions: Arc<Vec<Transaction>>,
    capacity: usize,
}

impl LoadedSource {
    /// Wraps loaded transactions.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>, capacity: usize) -> Self {
        Self {
            transactions: Arc::new(transactions),
            capacity: capacity.max(1),
        }
    }
}

impl TransactionSource for LoadedSource {
    fn subscribe(
        &self,
        scope: &Scope,
        query: &RangeQuery,
        sink: SnapshotSink,
    ) -> Result<Box<dyn Subscription>, FeedError> {
        let (tx, rx) = mpsc::channel::<SnapshotResult>(self.capacity);
        let transactions = Arc::clone(&self.transactions);
        let query = query.clone();
        let scope = scope.clone();

        tokio::spawn(async move {
            let snapshot: Vec<Transaction> = transactions
                .iter()
                .filter(|t| query.matches(t))
                .cloned()
                .collect();
            tracing::debug!(%scope, records = snapshot.len(), "serving snapshot");
            if tx.send(Ok(snapshot)).await.is_ok() {
                // Stay open until the subscriber goes away.
                tx.closed().await;
            }
        });

        Ok(Box::new(spawn_forwarder(rx, sink)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxo_core::aggregate::Aggregator;
    use fluxo_core::feed::{AccessGrant, LiveView};
    use fluxo_core::period::YearMonth;
    use fluxo_core::transaction::TransactionType;
    use fluxo_core::view::ViewConfig;
    use fluxo_shared::types::UserId;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_serves_query_through_channel() {
        let transactions = vec![
            Transaction::new("in", "2026-01-05", TransactionType::Income, Decimal::from(100)),
            Transaction::new("out", "2026-01-06", TransactionType::Expense, Decimal::from(40)),
            Transaction::new("later", "2026-02-01", TransactionType::Expense, Decimal::from(7)),
        ];
        let view = ViewConfig::for_months(YearMonth::new(2026, 1).unwrap(), None).unwrap();
        let live = LiveView::new(
            Arc::new(LoadedSource::new(transactions, 4)),
            Aggregator::default(),
            view,
        );

        let mut outputs = live.subscribe_outputs();
        let user = UserId::new("local");
        live.switch_scope(&AccessGrant::allow(user.clone()), Scope::Personal(user))
            .unwrap();
        outputs.mark_unchanged();
        outputs.changed().await.unwrap();

        let output = live.current();
        assert_eq!(output.rows.len(), 2);
        assert_eq!(output.aggregate.net_balance, Decimal::from(60));
        assert!(live.last_error().is_none());
    }
}
