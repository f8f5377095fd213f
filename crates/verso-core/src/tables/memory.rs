//! In-memory record table.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{VersoError, VersoResult};
use crate::traits::{RecordTable, ScanFilter, SortOrder};
use crate::types::{RecordKey, UserRecord};

#[derive(Default)]
struct Inner {
    records: BTreeMap<RecordKey, UserRecord>,
    by_email: BTreeMap<String, BTreeSet<RecordKey>>,
}

impl Inner {
    fn unindex(&mut self, key: &RecordKey, email: &str) {
        if let Some(keys) = self.by_email.get_mut(email) {
            keys.remove(key);
            if keys.is_empty() {
                self.by_email.remove(email);
            }
        }
    }
}

/// Record table held entirely in process memory.
///
/// Records live in a `BTreeMap` keyed by `(user_id, timestamp)`, so the
/// versions of one user are contiguous and already ordered by version key.
/// The email index maps each address to the keys that carry it.
#[derive(Default)]
pub struct MemoryTable {
    inner: RwLock<Inner>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> VersoResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| VersoError::storage("memory table lock poisoned"))
    }

    fn write(&self) -> VersoResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| VersoError::storage("memory table lock poisoned"))
    }
}

#[async_trait]
impl RecordTable for MemoryTable {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, record: UserRecord) -> VersoResult<()> {
        let mut inner = self.write()?;
        let key = record.key();

        if let Some(previous) = inner.records.get(&key).map(|r| r.email.clone()) {
            inner.unindex(&key, &previous);
        }
        inner
            .by_email
            .entry(record.email.clone())
            .or_default()
            .insert(key.clone());
        inner.records.insert(key, record);
        Ok(())
    }

    async fn query(
        &self,
        user_id: &str,
        order: SortOrder,
        limit: Option<usize>,
    ) -> VersoResult<Vec<UserRecord>> {
        let inner = self.read()?;
        let start = RecordKey::new(user_id, "");
        let mut versions: Vec<&UserRecord> = inner
            .records
            .range(start..)
            .take_while(|(key, _)| key.user_id == user_id)
            .map(|(_, record)| record)
            .collect();

        if order == SortOrder::Descending {
            versions.reverse();
        }
        if let Some(limit) = limit {
            versions.truncate(limit);
        }
        Ok(versions.into_iter().cloned().collect())
    }

    async fn delete(&self, user_id: &str, timestamp: &str) -> VersoResult<bool> {
        let mut inner = self.write()?;
        let key = RecordKey::new(user_id, timestamp);

        match inner.records.remove(&key) {
            Some(record) => {
                inner.unindex(&key, &record.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scan(&self, filter: Option<ScanFilter>) -> VersoResult<Vec<UserRecord>> {
        let inner = self.read()?;
        Ok(inner
            .records
            .values()
            .filter(|record| filter.as_ref().map_or(true, |f| f.matches(record)))
            .cloned()
            .collect())
    }

    async fn query_email(&self, email: &str) -> VersoResult<Vec<UserRecord>> {
        let inner = self.read()?;
        let Some(keys) = inner.by_email.get(email) else {
            return Ok(Vec::new());
        };

        keys.iter()
            .map(|key| {
                inner.records.get(key).cloned().ok_or_else(|| {
                    VersoError::corrupt_record(format!(
                        "email index points at missing record {}/{}",
                        key.user_id, key.timestamp
                    ))
                })
            })
            .collect()
    }

    async fn count(&self) -> VersoResult<u64> {
        Ok(self.read()?.records.len() as u64)
    }
}
