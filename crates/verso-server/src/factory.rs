//! Factory for creating a UserStore from configuration.

use std::sync::Arc;

use tracing::info;
use verso_core::{
    Backend, MemoryTable, RecordTable, SqliteTable, StoreConfig, UserStore, VersoResult,
};

/// Create a UserStore backed by the table named in `config`.
pub fn create_store(config: StoreConfig) -> VersoResult<UserStore> {
    config.validate()?;
    let table = create_table(&config)?;
    Ok(UserStore::new(table, config))
}

fn create_table(config: &StoreConfig) -> VersoResult<Arc<dyn RecordTable>> {
    match config.backend {
        Backend::Memory => {
            info!("Using in-memory table");
            Ok(Arc::new(MemoryTable::new()))
        }
        Backend::Sqlite => {
            info!(path = %config.sqlite_path.display(), "Using SQLite table");
            Ok(Arc::new(SqliteTable::new(&config.sqlite_path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend() {
        let store = create_store(StoreConfig::default()).unwrap();
        assert_eq!(store.info().await.unwrap().backend, "memory");
    }

    #[tokio::test]
    async fn test_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::builder()
            .sqlite_path(dir.path().join("users.db"))
            .build();

        let store = create_store(config).unwrap();
        assert_eq!(store.config().backend, Backend::Sqlite);
        assert_eq!(store.info().await.unwrap().backend, "sqlite");
    }
}
