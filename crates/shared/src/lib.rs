//! Shared types, errors, and configuration for Fluxo.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for transactions and collection owners
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, EngineConfig, FeedConfig, PartyConfig};
pub use error::{AppError, AppResult};
