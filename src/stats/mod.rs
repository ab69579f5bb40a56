//! Aggregation engine
//!
//! Turns the raw append-only visit log into derived views for a requested
//! time window: visit totals, an hourly histogram, a daily series and
//! ranked top-N breakdowns for pages and referrers.
//!
//! The engine is stateless: every query resolves its window to an
//! epoch-millisecond threshold, reads the matching slice of the log and
//! aggregates it in memory.

pub mod engine;
pub mod models;
pub mod period;

pub use engine::{StatsEngine, StatsError};
pub use models::{StatsResult, DIRECT_TRAFFIC};
pub use period::Period;
