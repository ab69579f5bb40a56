use crate::models::{NewVisit, VisitEvent};
use crate::storage::{EventStore, StoreError, StoreResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteEventStore {
    pool: Arc<SqlitePool>,
}

impl SqliteEventStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp INTEGER NOT NULL,
                date TEXT NOT NULL,
                hour INTEGER NOT NULL,
                user_agent TEXT,
                referrer TEXT,
                url TEXT,
                ip_address TEXT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        // Windowed reads filter on timestamp
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_visits_timestamp ON visits(timestamp)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn append(&self, visit: &NewVisit) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO visits (timestamp, date, hour, user_agent, referrer, url, ip_address)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(visit.timestamp)
        .bind(&visit.date)
        .bind(visit.hour as i64)
        .bind(&visit.user_agent)
        .bind(&visit.referrer)
        .bind(&visit.url)
        .bind(&visit.ip_address)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Write(e.into()))?;

        Ok(result.last_insert_rowid())
    }

    async fn query_since(&self, threshold_millis: i64) -> StoreResult<Vec<VisitEvent>> {
        let events = sqlx::query_as::<_, VisitEvent>(
            r#"
            SELECT id, timestamp, date, hour, user_agent, referrer, url, ip_address
            FROM visits
            WHERE timestamp >= ?
            "#,
        )
        .bind(threshold_millis)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::Read(e.into()))?;

        Ok(events)
    }
}
