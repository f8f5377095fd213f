//! Record table trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VersoResult;
use crate::types::UserRecord;

/// Sort direction for partition queries over the version key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    /// Latest version first.
    #[default]
    Descending,
}

/// Server-side filter applied during a full scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFilter {
    /// `min <= age <= max`.
    AgeBetween { min: i64, max: i64 },
    /// `created_at > cutoff`, compared as version-key strings.
    CreatedAfter(String),
}

impl ScanFilter {
    /// Whether `record` passes this filter.
    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            ScanFilter::AgeBetween { min, max } => record.age >= *min && record.age <= *max,
            ScanFilter::CreatedAfter(cutoff) => record.created_at.as_str() > cutoff.as_str(),
        }
    }
}

/// Storage backend statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// Backend name.
    pub backend: String,
    /// Number of physical records.
    pub record_count: u64,
}

/// A table keyed by `(user_id, timestamp)` with one secondary index on `email`.
///
/// Every backend (in-memory, SQLite) implements this. Implementations provide
/// atomic single-record put/delete; nothing spans multiple records.
#[async_trait]
pub trait RecordTable: Send + Sync {
    /// Backend name, for diagnostics.
    fn backend(&self) -> &'static str;

    /// Insert a record, replacing any record with the same key.
    async fn put(&self, record: UserRecord) -> VersoResult<()>;

    /// Every version of `user_id` ordered by version key.
    async fn query(
        &self,
        user_id: &str,
        order: SortOrder,
        limit: Option<usize>,
    ) -> VersoResult<Vec<UserRecord>>;

    /// Remove one physical record. Returns whether it existed.
    async fn delete(&self, user_id: &str, timestamp: &str) -> VersoResult<bool>;

    /// Every physical record, optionally filtered. Order is unspecified.
    async fn scan(&self, filter: Option<ScanFilter>) -> VersoResult<Vec<UserRecord>>;

    /// Every physical record whose email equals `email`, via the secondary index.
    async fn query_email(&self, email: &str) -> VersoResult<Vec<UserRecord>>;

    /// Number of physical records.
    async fn count(&self) -> VersoResult<u64>;

    /// Backend statistics.
    async fn info(&self) -> VersoResult<TableInfo> {
        Ok(TableInfo {
            backend: self.backend().to_string(),
            record_count: self.count().await?,
        })
    }

    /// The latest version of `user_id`, if any.
    async fn latest(&self, user_id: &str) -> VersoResult<Option<UserRecord>> {
        Ok(self
            .query(user_id, SortOrder::Descending, Some(1))
            .await?
            .into_iter()
            .next())
    }
}
