//! User store operations.

mod samples;
mod store;

pub use samples::sample_users;
pub use store::{AgeScan, RecentUsers, UserStore};
