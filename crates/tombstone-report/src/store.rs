//! In-memory store of the most recent deleted users fetch.

use chrono::{DateTime, Duration, Utc};
use tombstone_graph::{DeletedUserRecord, GraphClient, Session};
use tracing::{info, instrument};

use crate::ReportResult;

/// How far back the report looks.
pub const LOOKBACK_DAYS: i64 = 180;

/// Start of the fetch window for a fetch made at `now`.
#[must_use]
pub fn lookback_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(LOOKBACK_DAYS)
}

/// Holds exactly the records of the last successful fetch, in API order.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<DeletedUserRecord>,
    fetched_at: Option<DateTime<Utc>>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole contents.
    pub fn replace(&mut self, records: Vec<DeletedUserRecord>, fetched_at: DateTime<Utc>) {
        self.records = records;
        self.fetched_at = Some(fetched_at);
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.fetched_at = None;
    }

    #[must_use]
    pub fn records(&self) -> &[DeletedUserRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the current contents were fetched.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Fetches users deleted in the last [`LOOKBACK_DAYS`] days and replaces
    /// the store with them. On error the previous contents are kept.
    #[instrument(skip(self, client, session))]
    pub async fn fetch_deleted_users(
        &mut self,
        client: &GraphClient,
        session: &Session,
        now: DateTime<Utc>,
    ) -> ReportResult<usize> {
        let records = client.list_deleted_users(session, lookback_start(now)).await?;
        let count = records.len();
        self.replace(records, now);
        info!(count, "Result store refreshed");
        Ok(count)
    }
}
