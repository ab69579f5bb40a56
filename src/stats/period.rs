//! Query period selection and window resolution

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

use crate::stats::engine::StatsError;

/// Time window selector for an aggregate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The current calendar day, from local midnight.
    Day,
    /// A rolling 7x24h window, not calendar-week-aligned.
    Week,
    /// The current calendar month, from local midnight on day 1.
    Month,
    /// Everything since the epoch.
    All,
}

impl Period {
    /// Parse a period selector. Exact, case-sensitive match; anything
    /// other than `day`, `week`, `month` or `all` is invalid.
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        match raw {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(StatsError::InvalidPeriod(other.to_string())),
        }
    }

    /// Resolve the window start for this period to epoch milliseconds,
    /// relative to `now` in its own timezone.
    pub fn window_start_millis<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i64 {
        match self {
            Period::Day => {
                resolve_in_zone(now.timezone(), now.date_naive().and_time(NaiveTime::MIN))
            }
            Period::Week => (now.clone() - Duration::days(7)).timestamp_millis(),
            Period::Month => {
                let first = now
                    .date_naive()
                    .with_day(1)
                    .unwrap_or_else(|| now.date_naive());
                resolve_in_zone(now.timezone(), first.and_time(NaiveTime::MIN))
            }
            Period::All => 0,
        }
    }
}

/// Map a wall-clock time back to an instant. An ambiguous wall time (clocks
/// fell back) resolves to the earliest instant; a nonexistent one (clocks
/// sprang forward over midnight) falls back to the UTC reading. Both widen
/// the window rather than narrowing it.
fn resolve_in_zone<Tz: TimeZone>(tz: Tz, local: NaiveDateTime) -> i64 {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => Utc.from_utc_datetime(&local).timestamp_millis(),
    }
}
