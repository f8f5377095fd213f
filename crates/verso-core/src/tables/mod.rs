//! Record table backends.

mod memory;
mod sqlite;

pub use memory::MemoryTable;
pub use sqlite::SqliteTable;
