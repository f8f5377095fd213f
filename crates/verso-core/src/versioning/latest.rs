//! Latest-version resolution over a set of physical records.

use std::collections::HashMap;

use crate::types::UserRecord;

/// Keep exactly one record per `user_id`: the one with the greatest version key.
///
/// Output order is unspecified.
pub fn collapse_latest(records: impl IntoIterator<Item = UserRecord>) -> Vec<UserRecord> {
    let mut latest: HashMap<String, UserRecord> = HashMap::new();

    for record in records {
        match latest.get(&record.user_id) {
            Some(current) if !record.is_newer_than(current) => {}
            _ => {
                latest.insert(record.user_id.clone(), record);
            }
        }
    }

    latest.into_values().collect()
}

/// Sort records by `created_at`, newest first. Ties keep a stable order by user id.
pub fn sort_by_created_desc(records: &mut [UserRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}
