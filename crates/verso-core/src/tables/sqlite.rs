//! SQLite-backed record table.
//!
//! One `users` table with the composite primary key `(user_id, timestamp)`
//! and a secondary index on `email`. The primary key index doubles as the
//! "latest version" index: a descending scan over one `user_id` with
//! `LIMIT 1` returns the current version without touching older ones.

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{VersoError, VersoResult};
use crate::traits::{RecordTable, ScanFilter, SortOrder};
use crate::types::UserRecord;

const COLUMNS: &str =
    "user_id, timestamp, name, email, age, phone, address, created_at, updated_at";

/// SQLite record table.
pub struct SqliteTable {
    conn: Mutex<Connection>,
}

impl SqliteTable {
    /// Open (or create) a table at the given path. `:memory:` opens a private
    /// in-memory database.
    pub fn new(path: impl AsRef<Path>) -> VersoResult<Self> {
        let path = path.as_ref();
        let conn = if path.to_str() == Some(":memory:") {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(path)?
        };

        let table = Self {
            conn: Mutex::new(conn),
        };
        table.init_schema()?;
        Ok(table)
    }

    /// Create an in-memory table (for testing).
    pub fn in_memory() -> VersoResult<Self> {
        Self::new(":memory:")
    }

    fn lock(&self) -> VersoResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| VersoError::storage(e.to_string()))
    }

    fn init_schema(&self) -> VersoResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id    TEXT NOT NULL,
                timestamp  TEXT NOT NULL,
                name       TEXT NOT NULL,
                email      TEXT NOT NULL,
                age        INTEGER NOT NULL DEFAULT 0,
                phone      TEXT,
                address    TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, timestamp)
            );

            CREATE INDEX IF NOT EXISTS idx_users_email
                ON users(email);
        "#,
        )?;
        Ok(())
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
        Ok(UserRecord {
            user_id: row.get(0)?,
            timestamp: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            age: row.get(4)?,
            phone: row.get(5)?,
            address: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn collect(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> VersoResult<Vec<UserRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_record)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[async_trait]
impl RecordTable for SqliteTable {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn put(&self, record: UserRecord) -> VersoResult<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO users ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                COLUMNS
            ),
            params![
                record.user_id,
                record.timestamp,
                record.name,
                record.email,
                record.age,
                record.phone,
                record.address,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    async fn query(
        &self,
        user_id: &str,
        order: SortOrder,
        limit: Option<usize>,
    ) -> VersoResult<Vec<UserRecord>> {
        let conn = self.lock()?;
        let direction = match order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(|l| l as i64).unwrap_or(-1);

        Self::collect(
            &conn,
            &format!(
                "SELECT {} FROM users WHERE user_id = ?1 ORDER BY timestamp {} LIMIT ?2",
                COLUMNS, direction
            ),
            params![user_id, limit],
        )
    }

    async fn delete(&self, user_id: &str, timestamp: &str) -> VersoResult<bool> {
        let conn = self.lock()?;
        let count = conn.execute(
            "DELETE FROM users WHERE user_id = ?1 AND timestamp = ?2",
            params![user_id, timestamp],
        )?;
        Ok(count > 0)
    }

    async fn scan(&self, filter: Option<ScanFilter>) -> VersoResult<Vec<UserRecord>> {
        let conn = self.lock()?;
        match filter {
            None => Self::collect(&conn, &format!("SELECT {} FROM users", COLUMNS), &[]),
            Some(ScanFilter::AgeBetween { min, max }) => Self::collect(
                &conn,
                &format!("SELECT {} FROM users WHERE age BETWEEN ?1 AND ?2", COLUMNS),
                params![min, max],
            ),
            Some(ScanFilter::CreatedAfter(cutoff)) => Self::collect(
                &conn,
                &format!("SELECT {} FROM users WHERE created_at > ?1", COLUMNS),
                params![cutoff],
            ),
        }
    }

    async fn query_email(&self, email: &str) -> VersoResult<Vec<UserRecord>> {
        let conn = self.lock()?;
        Self::collect(
            &conn,
            &format!(
                "SELECT {} FROM users WHERE email = ?1 ORDER BY user_id, timestamp",
                COLUMNS
            ),
            params![email],
        )
    }

    async fn count(&self) -> VersoResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
