//! How the store behaves when its table fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;
use verso_core::{
    ErrorCode, NewUser, RecordTable, ScanFilter, SortOrder, StoreConfig, UserRecord, UserStore,
    VersoError, VersoResult,
};

mock! {
    pub Table {}

    #[async_trait]
    impl RecordTable for Table {
        fn backend(&self) -> &'static str;
        async fn put(&self, record: UserRecord) -> VersoResult<()>;
        async fn query(
            &self,
            user_id: &str,
            order: SortOrder,
            limit: Option<usize>,
        ) -> VersoResult<Vec<UserRecord>>;
        async fn delete(&self, user_id: &str, timestamp: &str) -> VersoResult<bool>;
        async fn scan(&self, filter: Option<ScanFilter>) -> VersoResult<Vec<UserRecord>>;
        async fn query_email(&self, email: &str) -> VersoResult<Vec<UserRecord>>;
        async fn count(&self) -> VersoResult<u64>;
    }
}

fn store(table: MockTable) -> UserStore {
    UserStore::new(Arc::new(table), StoreConfig::default())
}

#[tokio::test]
async fn batch_create_reports_failed_put_and_continues() {
    let mut table = MockTable::new();
    table.expect_put().times(3).returning(|record| {
        if record.name == "Unlucky" {
            Err(VersoError::storage("write rejected"))
        } else {
            Ok(())
        }
    });

    let outcome = store(table)
        .batch_create(vec![
            NewUser::new("First", "1@x.com"),
            NewUser::new("Unlucky", "2@x.com"),
            NewUser::new("Third", "3@x.com"),
        ])
        .await
        .unwrap();

    let names: Vec<_> = outcome.created.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Third"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].index, 1);
    assert_eq!(outcome.failed[0].code, "DB_002");
    assert!(outcome.failed[0].error.contains("write rejected"));
}

#[tokio::test]
async fn get_latest_propagates_storage_error() {
    let mut table = MockTable::new();
    table
        .expect_query()
        .withf(|user_id, order, limit| {
            user_id == "u1" && *order == SortOrder::Descending && *limit == Some(1)
        })
        .times(1)
        .returning(|_, _, _| Err(VersoError::storage("connection lost")));

    let err = store(table).get_latest("u1").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbOperationFailed);
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn batch_get_fails_whole_request_on_storage_error() {
    let mut table = MockTable::new();
    table.expect_query().returning(|user_id, _, _| {
        if user_id == "broken" {
            Err(VersoError::storage("read failed"))
        } else {
            Ok(vec![])
        }
    });

    let err = store(table)
        .batch_get(vec!["ok".into(), "broken".into()])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbOperationFailed);
}

#[tokio::test]
async fn delete_stops_at_first_failed_removal() {
    let versions = vec![
        UserRecord::new("u1", "2024-01-01T00:00:00.000000", "A", "a@x.com"),
        UserRecord::new("u1", "2024-01-02T00:00:00.000000", "A", "a@x.com"),
    ];

    let mut table = MockTable::new();
    table
        .expect_query()
        .times(1)
        .returning(move |_, _, _| Ok(versions.clone()));
    table
        .expect_delete()
        .with(eq("u1"), eq("2024-01-01T00:00:00.000000"))
        .times(1)
        .returning(|_, _| Err(VersoError::storage("locked")));

    let err = store(table).delete("u1").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbOperationFailed);
}

#[tokio::test]
async fn query_by_email_rejects_blank_without_touching_table() {
    // No expectations: any table call would panic.
    let table = MockTable::new();

    let err = store(table).query_by_email("  ").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValMissingField);
}
