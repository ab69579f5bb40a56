//! Output model for aggregate queries

use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel label visits with no referrer are grouped under.
pub const DIRECT_TRAFFIC: &str = "direct traffic";

/// Maximum number of entries in a ranked breakdown.
pub const TOP_LIMIT: usize = 10;

/// Aggregated statistics for one time window.
///
/// Serialized field names are the wire contract consumed by the dashboard:
/// `totalVisits`, `uniqueVisitors`, `hourlyData`, `dailyData`, `topPages`,
/// `topReferrers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    /// Count of all events in the window.
    pub total_visits: i64,
    /// Count of distinct `ip_address` values in the window. Visits with no
    /// recorded address share a single empty-string bucket.
    pub unique_visitors: i64,
    /// Visit counts by hour of day, aggregated across every day in the
    /// window (a single 24-slot vector, not a per-day matrix).
    pub hourly_data: [i64; 24],
    /// Visit counts by day key. Days with zero events are absent rather
    /// than zero-filled.
    pub daily_data: BTreeMap<String, i64>,
    /// (url, count) pairs, at most [`TOP_LIMIT`], count descending.
    pub top_pages: Vec<(String, i64)>,
    /// (referrer label, count) pairs, at most [`TOP_LIMIT`], count
    /// descending, with empty referrers grouped under [`DIRECT_TRAFFIC`].
    pub top_referrers: Vec<(String, i64)>,
}
