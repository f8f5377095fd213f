//! verso-core - Core library for verso.
//!
//! This crate provides the record types, storage traits and backends, and
//! the [`UserStore`] that implements append-only, multi-version user records.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use verso_core::{MemoryTable, NewUser, StoreConfig, UserPatch, UserStore};
//!
//! # tokio_test::block_on(async {
//! let store = UserStore::new(Arc::new(MemoryTable::new()), StoreConfig::default());
//!
//! // Create, then append a second version
//! let user = store.create(NewUser::new("Ada", "ada@example.com")).await?;
//! store.update(&user.user_id, UserPatch::default().age(36)).await?;
//!
//! // Both versions remain, latest first
//! let history = store.query_history(&user.user_id).await?;
//! assert_eq!(history.len(), 2);
//! assert_eq!(history[0].age, 36);
//! # Ok::<(), verso_core::VersoError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod tables;
pub mod traits;
pub mod types;
pub mod users;
pub mod versioning;

// Re-export commonly used types
pub use config::{Backend, StoreConfig};
pub use error::{ErrorCode, VersoError, VersoResult};
pub use tables::{MemoryTable, SqliteTable};
pub use traits::{RecordTable, ScanFilter, SortOrder, TableInfo};
pub use types::{
    BatchFailure, BatchOperation, BatchReadOutcome, BatchWriteOutcome, NewUser, QueryOperation,
    RecordKey, UserPatch, UserRecord,
};
pub use users::{sample_users, AgeScan, RecentUsers, UserStore};
