//! Category spending goals and progress tracking.

pub mod error;
pub mod service;
pub mod types;


pub use error::GoalError;
pub use service::GoalService;
pub use types::{GoalProgress, GoalTier, Goals};
