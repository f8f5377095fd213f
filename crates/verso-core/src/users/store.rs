//! The versioned user store.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{ErrorCode, VersoError, VersoResult};
use crate::traits::{RecordTable, ScanFilter, SortOrder, TableInfo};
use crate::types::{
    BatchFailure, BatchReadOutcome, BatchWriteOutcome, NewUser, UserPatch, UserRecord,
};
use crate::versioning::{
    collapse_latest, cutoff_key, next_key, sort_by_created_desc, system_clock, Clock,
};

use super::samples::sample_users;

/// A batch entry, or the requested id and error of an entry that did not decode.
type BatchEntry = Result<NewUser, (Option<String>, VersoError)>;

/// Result of an age-range scan, with the bounds that were applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeScan {
    pub min_age: i64,
    pub max_age: i64,
    pub users: Vec<UserRecord>,
}

/// Result of a recent-users query, with the window that was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentUsers {
    pub hours: i64,
    pub cutoff_time: String,
    pub users: Vec<UserRecord>,
}

/// Append-only, multi-version user store over a single [`RecordTable`].
///
/// Writes never modify a stored record: `create` and `update` both append a
/// new version, and `delete` removes every version of a user. Reads resolve a
/// user's current state as its version with the greatest key.
///
/// Concurrent updates to the same user are not serialized. Both succeed and
/// produce two versions; the one with the greater key wins.
pub struct UserStore {
    table: Arc<dyn RecordTable>,
    config: StoreConfig,
    clock: Clock,
}

impl UserStore {
    /// Create a store over `table`.
    pub fn new(table: Arc<dyn RecordTable>, config: StoreConfig) -> Self {
        Self {
            table,
            config,
            clock: system_clock(),
        }
    }

    /// Replace the clock used for version keys and time windows.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Backend statistics.
    pub async fn info(&self) -> VersoResult<TableInfo> {
        self.table.info().await
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Store the first version of a user.
    ///
    /// A fresh UUID is assigned when `input.user_id` is absent. When the
    /// caller supplies an id that already has versions, the new record is
    /// appended after them.
    pub async fn create(&self, input: NewUser) -> VersoResult<UserRecord> {
        input.validate()?;

        let (user_id, previous) = match input.user_id.clone() {
            Some(id) => {
                let previous = self.table.latest(&id).await?;
                (id, previous)
            }
            None => (Uuid::new_v4().to_string(), None),
        };

        let timestamp = next_key(self.now(), previous.as_ref().map(|r| r.timestamp.as_str()));
        let record = input.into_record(user_id, timestamp)?;
        self.table.put(record.clone()).await?;

        debug!(
            user_id = %record.user_id,
            version = %record.timestamp,
            "Created user"
        );
        Ok(record)
    }

    /// The current version of a user.
    pub async fn get_latest(&self, user_id: &str) -> VersoResult<UserRecord> {
        self.table
            .latest(user_id)
            .await?
            .ok_or_else(|| VersoError::not_found(user_id))
    }

    /// The current version of every user. Order is unspecified.
    pub async fn list_latest(&self) -> VersoResult<Vec<UserRecord>> {
        let records = self.table.scan(None).await?;
        let scanned = records.len();
        let users = collapse_latest(records);

        debug!(scanned, users = users.len(), "Listed latest users");
        Ok(users)
    }

    /// Append a new version of a user with `patch` applied over the current one.
    ///
    /// `user_id` and `created_at` carry over; the version key and `updated_at`
    /// are set to the current time. An empty patch still appends a version.
    pub async fn update(&self, user_id: &str, patch: UserPatch) -> VersoResult<UserRecord> {
        patch.validate()?;
        let current = self.get_latest(user_id).await?;

        let timestamp = next_key(self.now(), Some(&current.timestamp));
        let mut next = current.clone();
        patch.apply_to(&mut next);
        next.timestamp = timestamp.clone();
        next.updated_at = timestamp;

        self.table.put(next.clone()).await?;

        debug!(
            user_id = %next.user_id,
            previous = %current.timestamp,
            version = %next.timestamp,
            empty_patch = patch.is_empty(),
            "Updated user"
        );
        Ok(next)
    }

    /// Remove every version of a user. Returns how many versions were removed.
    pub async fn delete(&self, user_id: &str) -> VersoResult<usize> {
        let versions = self
            .table
            .query(user_id, SortOrder::Ascending, None)
            .await?;
        if versions.is_empty() {
            return Err(VersoError::not_found(user_id));
        }

        let mut removed = 0;
        for version in &versions {
            if self.table.delete(&version.user_id, &version.timestamp).await? {
                removed += 1;
            }
        }

        debug!(user_id, removed, "Deleted user");
        Ok(removed)
    }

    /// Every stored version whose email matches, across all users. No collapsing.
    pub async fn query_by_email(&self, email: &str) -> VersoResult<Vec<UserRecord>> {
        if email.trim().is_empty() {
            return Err(VersoError::missing_field("email"));
        }
        self.table.query_email(email).await
    }

    /// Latest version per user among versions with `min <= age <= max`.
    ///
    /// Missing bounds fall back to the configured defaults.
    pub async fn scan_by_age(&self, min: Option<i64>, max: Option<i64>) -> VersoResult<AgeScan> {
        let min_age = min.unwrap_or(self.config.default_min_age);
        let max_age = max.unwrap_or(self.config.default_max_age);
        if min_age > max_age {
            return Err(VersoError::invalid_range(format!(
                "min_age ({}) must not exceed max_age ({})",
                min_age, max_age
            )));
        }

        let records = self
            .table
            .scan(Some(ScanFilter::AgeBetween {
                min: min_age,
                max: max_age,
            }))
            .await?;

        Ok(AgeScan {
            min_age,
            max_age,
            users: collapse_latest(records),
        })
    }

    /// Every version of a user, latest first. Empty when the user has none.
    pub async fn query_history(&self, user_id: &str) -> VersoResult<Vec<UserRecord>> {
        self.table
            .query(user_id, SortOrder::Descending, None)
            .await
    }

    /// Latest version per user among versions created in the last `hours`,
    /// newest `created_at` first.
    pub async fn query_recent(&self, hours: Option<i64>) -> VersoResult<RecentUsers> {
        let hours = hours.unwrap_or(self.config.default_recent_hours);
        if hours <= 0 {
            return Err(VersoError::invalid_range("hours must be a positive integer"));
        }

        let cutoff_time = cutoff_key(self.now(), hours)?;
        let records = self
            .table
            .scan(Some(ScanFilter::CreatedAfter(cutoff_time.clone())))
            .await?;

        let mut users = collapse_latest(records);
        sort_by_created_desc(&mut users);

        Ok(RecentUsers {
            hours,
            cutoff_time,
            users,
        })
    }

    /// Create each input independently.
    ///
    /// Invalid or failing entries are reported in `failed` and do not stop the
    /// rest; entries already written are never rolled back.
    pub async fn batch_create(&self, inputs: Vec<NewUser>) -> VersoResult<BatchWriteOutcome> {
        self.write_entries(inputs.into_iter().map(Ok).collect()).await
    }

    /// [`batch_create`](Self::batch_create) over raw JSON entries.
    ///
    /// An entry that does not decode as a [`NewUser`] is reported in `failed`
    /// at its position, like any other invalid entry.
    pub async fn batch_create_json(
        &self,
        entries: Vec<serde_json::Value>,
    ) -> VersoResult<BatchWriteOutcome> {
        let decoded = entries
            .into_iter()
            .map(|value| {
                let user_id = value
                    .get("user_id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                NewUser::from_value(value).map_err(|e| (user_id, e))
            })
            .collect();
        self.write_entries(decoded).await
    }

    async fn write_entries(&self, entries: Vec<BatchEntry>) -> VersoResult<BatchWriteOutcome> {
        if entries.is_empty() {
            return Err(VersoError::empty_batch("No users data provided"));
        }
        self.check_batch_size(entries.len())?;

        let mut outcome = BatchWriteOutcome::default();
        for (index, entry) in entries.into_iter().enumerate() {
            let written = match entry {
                Ok(input) => {
                    let user_id = input.user_id.clone();
                    self.create(input).await.map_err(|e| (user_id, e))
                }
                Err(rejected) => Err(rejected),
            };

            match written {
                Ok(record) => outcome.created.push(record),
                Err((user_id, e)) => {
                    warn!(index, error = %e, "Batch entry not written");
                    outcome.failed.push(BatchFailure {
                        index,
                        user_id,
                        code: e.code().as_str().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        debug!(
            requested = outcome.total(),
            created = outcome.created.len(),
            failed = outcome.failed.len(),
            "Batch write finished"
        );
        Ok(outcome)
    }

    /// Latest version of each id, partitioned into found and not found.
    ///
    /// Lookups run concurrently; both output lists keep request order.
    pub async fn batch_get(&self, user_ids: Vec<String>) -> VersoResult<BatchReadOutcome> {
        if user_ids.is_empty() {
            return Err(VersoError::empty_batch("No user IDs provided"));
        }
        self.check_batch_size(user_ids.len())?;

        let lookups = join_all(user_ids.iter().map(|id| self.table.latest(id))).await;

        let mut outcome = BatchReadOutcome::default();
        for (user_id, lookup) in user_ids.into_iter().zip(lookups) {
            match lookup? {
                Some(record) => outcome.found.push(record),
                None => outcome.not_found.push(user_id),
            }
        }
        Ok(outcome)
    }

    /// Insert the built-in sample users under fresh ids.
    pub async fn populate_sample_data(&self) -> VersoResult<Vec<UserRecord>> {
        let mut created = Vec::new();
        for input in sample_users() {
            created.push(self.create(input).await?);
        }
        debug!(count = created.len(), "Populated sample users");
        Ok(created)
    }

    fn check_batch_size(&self, len: usize) -> VersoResult<()> {
        if len > self.config.max_batch_size {
            return Err(VersoError::Validation {
                message: format!(
                    "Batch of {} entries exceeds the limit of {}",
                    len, self.config.max_batch_size
                ),
                code: ErrorCode::ValBatchTooLarge,
                field: None,
            });
        }
        Ok(())
    }
}
