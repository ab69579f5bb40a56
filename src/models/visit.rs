use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded page view, as stored in the `visits` table.
///
/// Events are immutable once stored; the store exposes no update or
/// delete path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VisitEvent {
    pub id: i64,
    /// Client-supplied epoch milliseconds. Authoritative time axis for
    /// window filtering; not cross-checked against the server clock.
    pub timestamp: i64,
    /// Calendar day key (`YYYY-MM-DD`), derived by the client.
    pub date: String,
    /// Hour of day 0-23, derived by the client.
    pub hour: i64,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub url: Option<String>,
    /// Server-derived client address. Used only as a de-duplication key
    /// for unique-visitor counting, never treated as an identity.
    pub ip_address: Option<String>,
}

/// A shaped visit ready for insertion: required fields resolved, optional
/// fields defaulted to empty strings, `ip_address` filled in server-side.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub timestamp: i64,
    pub date: String,
    pub hour: u8,
    pub user_agent: String,
    pub referrer: String,
    pub url: String,
    pub ip_address: String,
}

/// Inbound ingestion payload.
///
/// `timestamp`, `date` and `hour` are required; a payload missing any of
/// them (or carrying the wrong type) is rejected at the boundary rather
/// than coerced. The free-text fields are optional and default to empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordVisitRequest {
    pub timestamp: i64,
    pub date: String,
    pub hour: u8,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_payload() {
        let json = r#"{
            "timestamp": 1715770800000,
            "date": "2024-05-15",
            "hour": 11,
            "userAgent": "Mozilla/5.0",
            "referrer": "https://example.com",
            "url": "/about"
        }"#;

        let req: RecordVisitRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.timestamp, 1715770800000);
        assert_eq!(req.date, "2024-05-15");
        assert_eq!(req.hour, 11);
        assert_eq!(req.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let json = r#"{"timestamp": 1715770800000, "date": "2024-05-15", "hour": 0}"#;

        let req: RecordVisitRequest = serde_json::from_str(json).unwrap();
        assert!(req.user_agent.is_none());
        assert!(req.referrer.is_none());
        assert!(req.url.is_none());
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let json = r#"{"date": "2024-05-15", "hour": 3}"#;
        assert!(serde_json::from_str::<RecordVisitRequest>(json).is_err());
    }

    #[test]
    fn test_non_numeric_timestamp_is_rejected() {
        let json = r#"{"timestamp": "soon", "date": "2024-05-15", "hour": 3}"#;
        assert!(serde_json::from_str::<RecordVisitRequest>(json).is_err());
    }
}
