//! Version keys and latest-version resolution.
//!
//! Every write appends an immutable record keyed by `(user_id, timestamp)`.
//! A user's current state is the record with the greatest timestamp.

mod key;
mod latest;

pub use key::{
    cutoff_key, fixed_clock, format_key, next_key, parse_key, system_clock, Clock,
    VERSION_KEY_FORMAT,
};
pub use latest::{collapse_latest, sort_by_created_desc};
