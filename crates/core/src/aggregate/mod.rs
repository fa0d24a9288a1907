//! KPI, bucket, breakdown and goal aggregation.

pub mod responsibility;
pub mod service;
pub mod types;


#[cfg(test)]
mod benchmark;

pub use responsibility::{Attribution, ResponsibilityRules};
pub use service::{Aggregator, health_level, health_ratio};
pub use types::{
    AggregateResult, BucketPlan, HealthLevel, HealthRatio, PartyBalance, PeriodBucket,
};
