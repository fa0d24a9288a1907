//! Boundary contracts with the external transaction store and access gate.

use std::fmt;

use fluxo_shared::types::{GroupId, UserId};
use serde::{Deserialize, Serialize};

use super::error::FeedError;
use super::live::SnapshotSink;
use crate::period::DateRange;
use crate::transaction::Transaction;
use crate::view::{StatusMode, ViewConfig};

/// Collection a snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    /// A user's own transactions.
    Personal(UserId),
    /// A shared family group.
    Group(GroupId),
}

impl Scope {
    /// Store path of the scope's transaction collection.
    #[must_use]
    pub fn collection_path(&self) -> String {
        match self {
            Self::Personal(user) => format!("users/{user}/transactions"),
            Self::Group(group) => format!("groups/{group}/transactions"),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.collection_path())
    }
}

/// Signal from the auth gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Signed-in user.
    pub user_id: UserId,
    /// Whether the session may read any scope at all.
    pub allowed: bool,
}

impl AccessGrant {
    /// Grant for a signed-in, allowed user.
    #[must_use]
    pub fn allow(user_id: UserId) -> Self {
        Self {
            user_id,
            allowed: true,
        }
    }

    /// Checks that `scope` may be subscribed to.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::PermissionDenied` if the session is not allowed or
    /// a personal scope belongs to another user.
    pub fn authorize(&self, scope: &Scope) -> Result<(), FeedError> {
        if !self.allowed {
            return Err(FeedError::denied(format!(
                "session for {} is not allowed",
                self.user_id
            )));
        }
        match scope {
            Scope::Personal(owner) if *owner != self.user_id => Err(FeedError::denied(format!(
                "{} cannot read {scope}",
                self.user_id
            ))),
            _ => Ok(()),
        }
    }
}

/// Query pushed down to the source: a date range and an optional status filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// Inclusive date range.
    pub range: DateRange,
    /// `Some(true)` for realized only; `None` for every status.
    pub status: Option<bool>,
}

impl RangeQuery {
    /// The query a view needs from its source.
    #[must_use]
    pub fn for_view(view: &ViewConfig) -> Self {
        Self {
            range: view.range.clone(),
            status: match view.status_mode {
                StatusMode::RealizedOnly => Some(true),
                StatusMode::All => None,
            },
        }
    }

    /// True if `tx` satisfies the query.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.range.contains_key(&tx.date) && self.status.is_none_or(|status| tx.status == status)
    }
}

/// A live subscription handle.
pub trait Subscription: Send {
    /// Stops delivery. After this returns no further snapshot reaches the sink.
    fn cancel(&mut self);
}

/// A source of live transaction snapshots.
///
/// Implemented by adapters over the document store.
pub trait TransactionSource: Send + Sync {
    /// Starts delivering snapshots for `scope` matching `query` to `sink`.
    ///
    /// A source may deliver the first snapshot before this returns.
    fn subscribe(
        &self,
        scope: &Scope,
        query: &RangeQuery,
        sink: SnapshotSink,
    ) -> Result<Box<dyn Subscription>, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::YearMonth;
    use crate::transaction::TransactionType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_authorize() {
        let me = UserId::new("me");
        let grant = AccessGrant::allow(me.clone());

        assert!(grant.authorize(&Scope::Personal(me.clone())).is_ok());
        assert!(grant.authorize(&Scope::Group(GroupId::new("family"))).is_ok());
        assert!(matches!(
            grant.authorize(&Scope::Personal(UserId::new("other"))),
            Err(FeedError::PermissionDenied(_))
        ));

        let blocked = AccessGrant {
            user_id: me.clone(),
            allowed: false,
        };
        assert!(blocked.authorize(&Scope::Personal(me)).is_err());
    }

    #[test]
    fn test_collection_path() {
        assert_eq!(
            Scope::Personal(UserId::new("u1")).collection_path(),
            "users/u1/transactions"
        );
        assert_eq!(
            Scope::Group(GroupId::new("g1")).to_string(),
            "groups/g1/transactions"
        );
    }

    #[test]
    fn test_range_query_follows_view() {
        let view = ViewConfig::for_months(YearMonth::new(2026, 1).unwrap(), None).unwrap();
        let query = RangeQuery::for_view(&view);
        assert_eq!(query.status, Some(true));

        let realized = Transaction::new("a", "2026-01-05", TransactionType::Expense, dec!(1));
        let pending = realized.clone().pending();
        let outside = Transaction::new("b", "2026-02-01", TransactionType::Expense, dec!(1));
        assert!(query.matches(&realized));
        assert!(!query.matches(&pending));
        assert!(!query.matches(&outside));

        let all = RangeQuery::for_view(&view.with_status_mode(StatusMode::All));
        assert!(all.matches(&pending));
    }
}
