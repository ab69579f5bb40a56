//! Window aggregation over the visit log

use chrono::{DateTime, TimeZone};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::VisitEvent;
use crate::stats::models::{StatsResult, DIRECT_TRAFFIC, TOP_LIMIT};
use crate::stats::Period;
use crate::storage::{EventStore, StoreError};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("unknown period '{0}': expected one of day, week, month, all")]
    InvalidPeriod(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stateless query layer over an [`EventStore`].
///
/// Resolves a period to an epoch-millisecond threshold, reads the window
/// in one scan and derives all views from that single snapshot. A store
/// read failure yields no result rather than a degraded one.
pub struct StatsEngine {
    store: Arc<dyn EventStore>,
}

impl StatsEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn compute<Tz: TimeZone>(
        &self,
        period: Period,
        now: DateTime<Tz>,
    ) -> Result<StatsResult, StatsError> {
        let threshold = period.window_start_millis(&now);
        let events = self.store.query_since(threshold).await?;
        debug!(threshold, count = events.len(), "aggregating window");
        Ok(aggregate(&events))
    }
}

/// Derive all views from one pass over the window's events.
pub fn aggregate(events: &[VisitEvent]) -> StatsResult {
    let mut visitors: HashSet<&str> = HashSet::new();
    let mut hourly = [0i64; 24];
    let mut daily: BTreeMap<String, i64> = BTreeMap::new();
    let mut pages: HashMap<&str, i64> = HashMap::new();
    let mut referrers: HashMap<&str, i64> = HashMap::new();

    for event in events {
        // NULL and empty addresses share one bucket
        visitors.insert(event.ip_address.as_deref().unwrap_or(""));

        // hour is validated to 0-23 at the ingest boundary
        hourly[event.hour as usize] += 1;

        *daily.entry(event.date.clone()).or_insert(0) += 1;
        *pages.entry(event.url.as_deref().unwrap_or("")).or_insert(0) += 1;

        let referrer = match event.referrer.as_deref() {
            None | Some("") => DIRECT_TRAFFIC,
            Some(other) => other,
        };
        *referrers.entry(referrer).or_insert(0) += 1;
    }

    StatsResult {
        total_visits: events.len() as i64,
        unique_visitors: visitors.len() as i64,
        hourly_data: hourly,
        daily_data: daily,
        top_pages: rank(pages),
        top_referrers: rank(referrers),
    }
}

/// Sort count-descending, ties broken lexicographically by key, truncated
/// to the top-N limit.
fn rank(counts: HashMap<&str, i64>) -> Vec<(String, i64)> {
    let mut ranked: Vec<(String, i64)> = counts
        .into_iter()
        .map(|(key, count)| (key.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(hour: i64, date: &str, url: &str, referrer: &str, ip: &str) -> VisitEvent {
        VisitEvent {
            id: 0,
            timestamp: 0,
            date: date.to_string(),
            hour,
            user_agent: Some(String::new()),
            referrer: Some(referrer.to_string()),
            url: Some(url.to_string()),
            ip_address: Some(ip.to_string()),
        }
    }

    #[test]
    fn test_empty_window() {
        let result = aggregate(&[]);
        assert_eq!(result.total_visits, 0);
        assert_eq!(result.unique_visitors, 0);
        assert_eq!(result.hourly_data, [0; 24]);
        assert!(result.daily_data.is_empty());
        assert!(result.top_pages.is_empty());
        assert!(result.top_referrers.is_empty());
    }

    #[test]
    fn test_histogram_conservation() {
        let events = vec![
            visit(9, "2024-05-15", "/", "", "1.1.1.1"),
            visit(9, "2024-05-16", "/", "", "1.1.1.1"),
            visit(23, "2024-05-15", "/a", "", "2.2.2.2"),
            visit(0, "2024-05-17", "/b", "", "3.3.3.3"),
        ];

        let result = aggregate(&events);
        assert_eq!(result.hourly_data.iter().sum::<i64>(), result.total_visits);
        // hour 9 on two different days lands in one bucket
        assert_eq!(result.hourly_data[9], 2);
    }

    #[test]
    fn test_daily_series_skips_empty_days() {
        let events = vec![
            visit(1, "2024-05-15", "/", "", "1.1.1.1"),
            visit(2, "2024-05-17", "/", "", "1.1.1.1"),
            visit(3, "2024-05-17", "/", "", "1.1.1.1"),
        ];

        let result = aggregate(&events);
        assert_eq!(result.daily_data.len(), 2);
        assert_eq!(result.daily_data["2024-05-15"], 1);
        assert_eq!(result.daily_data["2024-05-17"], 2);
        assert!(!result.daily_data.contains_key("2024-05-16"));
    }

    #[test]
    fn test_referrer_normalization() {
        let mut events = vec![
            visit(1, "2024-05-15", "/", "", "1.1.1.1"),
            visit(2, "2024-05-15", "/", "https://google.com", "1.1.1.1"),
        ];
        // absent referrer joins the same bucket as empty
        events.push(VisitEvent {
            referrer: None,
            ..visit(3, "2024-05-15", "/", "", "1.1.1.1")
        });

        let result = aggregate(&events);
        assert_eq!(result.top_referrers.len(), 2);
        assert!(result
            .top_referrers
            .contains(&(DIRECT_TRAFFIC.to_string(), 2)));
        assert!(result
            .top_referrers
            .contains(&("https://google.com".to_string(), 1)));
    }

    #[test]
    fn test_top_pages_bounded_and_sorted() {
        let mut events = Vec::new();
        for i in 0..15 {
            for _ in 0..=i {
                events.push(visit(1, "2024-05-15", &format!("/page-{i}"), "", "1.1.1.1"));
            }
        }

        let result = aggregate(&events);
        assert_eq!(result.top_pages.len(), TOP_LIMIT);
        for pair in result.top_pages.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        // the most visited page wins
        assert_eq!(result.top_pages[0], ("/page-14".to_string(), 15));
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let events = vec![
            visit(1, "2024-05-15", "/b", "", "1.1.1.1"),
            visit(2, "2024-05-15", "/a", "", "1.1.1.1"),
            visit(3, "2024-05-15", "/c", "", "1.1.1.1"),
        ];

        let result = aggregate(&events);
        assert_eq!(
            result.top_pages,
            vec![
                ("/a".to_string(), 1),
                ("/b".to_string(), 1),
                ("/c".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_unique_visitors_by_address() {
        let events = vec![
            visit(1, "2024-05-15", "/", "", "1.1.1.1"),
            visit(2, "2024-05-15", "/about", "", "1.1.1.1"),
            visit(3, "2024-05-15", "/", "", "2.2.2.2"),
        ];

        let result = aggregate(&events);
        assert_eq!(result.total_visits, 3);
        assert_eq!(result.unique_visitors, 2);
    }

    #[test]
    fn test_missing_address_is_one_bucket() {
        let mut events = vec![visit(1, "2024-05-15", "/", "", "")];
        events.push(VisitEvent {
            ip_address: None,
            ..visit(2, "2024-05-15", "/", "", "")
        });
        events.push(visit(3, "2024-05-15", "/", "", "1.1.1.1"));

        let result = aggregate(&events);
        // NULL and "" collapse into a single distinct value
        assert_eq!(result.unique_visitors, 2);
    }
}
