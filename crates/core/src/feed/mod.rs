//! Live snapshot feed: scopes, sources and the always-current view.

pub mod channel;
pub mod error;
pub mod live;
pub mod memory;
pub mod source;

pub use channel::{ForwarderSubscription, spawn_forwarder};
pub use error::FeedError;
pub use live::{Delivery, LiveView, SnapshotResult, SnapshotSink, ViewOutput};
pub use memory::InMemorySource;
pub use source::{AccessGrant, RangeQuery, Scope, Subscription, TransactionSource};
