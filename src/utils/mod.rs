//! Shared utilities
//!
//! - `cache`: TTL cache for last-fetched catalog lists
//! - `labels`: display text and price formatting

pub mod cache;
pub mod labels;

pub use cache::{CacheStats, ListCache};
