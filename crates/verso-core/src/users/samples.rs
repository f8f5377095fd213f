//! Built-in sample users for demos and smoke tests.

use crate::types::NewUser;

#[rustfmt::skip]
const SAMPLES: [(&str, &str, i64, &str, &str); 8] = [
    ("John Doe", "john.doe@example.com", 30, "+1234567890", "123 Main St, New York, NY"),
    ("Jane Smith", "jane.smith@example.com", 28, "+1234567891", "456 Oak Ave, Los Angeles, CA"),
    ("Bob Johnson", "bob.johnson@example.com", 35, "+1234567892", "789 Pine St, Chicago, IL"),
    ("Alice Brown", "alice.brown@example.com", 26, "+1234567893", "321 Elm St, Houston, TX"),
    ("Charlie Wilson", "charlie.wilson@example.com", 42, "+1234567894", "654 Maple Dr, Phoenix, AZ"),
    ("Diana Davis", "diana.davis@example.com", 31, "+1234567895", "987 Cedar Ln, Philadelphia, PA"),
    ("Frank Miller", "frank.miller@example.com", 29, "+1234567896", "147 Birch Rd, San Antonio, TX"),
    ("Grace Taylor", "grace.taylor@example.com", 33, "+1234567897", "258 Spruce St, San Diego, CA"),
];

/// The sample users, without ids.
pub fn sample_users() -> Vec<NewUser> {
    SAMPLES
        .iter()
        .map(|(name, email, age, phone, address)| {
            NewUser::new(*name, *email)
                .with_age(*age)
                .with_phone(*phone)
                .with_address(*address)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_valid_and_distinct() {
        let users = sample_users();
        assert_eq!(users.len(), 8);
        assert!(users.iter().all(|u| u.validate().is_ok()));

        let mut emails: Vec<_> = users.iter().filter_map(|u| u.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 8);
    }
}
