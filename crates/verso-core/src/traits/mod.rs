//! Core traits for verso storage backends.

mod record_table;

pub use record_table::*;
