//! Stored user record types.

use serde::{Deserialize, Serialize};

/// One physical version of a user.
///
/// `(user_id, timestamp)` is unique across the table. The record with the
/// greatest `timestamp` for a given `user_id` is that user's current version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Logical identifier shared by every version of the user.
    pub user_id: String,
    /// Version key assigned at write time (fixed-width ISO-8601, UTC).
    pub timestamp: String,
    /// Display name.
    pub name: String,
    /// Email address, indexed for secondary lookups. Not unique.
    pub email: String,
    /// Age in years.
    #[serde(default)]
    pub age: i64,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// When the user's lineage was first written.
    pub created_at: String,
    /// When this version was written.
    pub updated_at: String,
}

impl UserRecord {
    /// Create a record with the required fields and every timestamp set to `timestamp`.
    pub fn new(
        user_id: impl Into<String>,
        timestamp: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            age: 0,
            phone: None,
            address: None,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
            timestamp,
        }
    }

    /// Set the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the postal address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set created_at timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Primary key of this physical record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            user_id: self.user_id.clone(),
            timestamp: self.timestamp.clone(),
        }
    }

    /// Whether this version supersedes `other` for the same user.
    pub fn is_newer_than(&self, other: &UserRecord) -> bool {
        self.timestamp > other.timestamp
    }
}

/// Composite primary key of a physical record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub user_id: String,
    pub timestamp: String,
}

impl RecordKey {
    pub fn new(user_id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp: timestamp.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let record = UserRecord::new("u1", "2024-01-01T00:00:00.000000", "Ada", "ada@x.com");
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("phone").is_none());
        assert!(json.get("address").is_none());
        assert_eq!(json["age"], 0);
        assert_eq!(json["created_at"], json["timestamp"]);
    }

    #[test]
    fn test_age_defaults_when_absent() {
        let record: UserRecord = serde_json::from_str(
            r#"{"user_id":"u1","timestamp":"t","name":"A","email":"a@x.com",
                "created_at":"t","updated_at":"t"}"#,
        )
        .unwrap();
        assert_eq!(record.age, 0);
        assert_eq!(record.phone, None);
    }

    #[test]
    fn test_is_newer_than() {
        let old = UserRecord::new("u1", "2024-01-01T00:00:00.000000", "A", "a@x.com");
        let new = UserRecord::new("u1", "2024-01-01T00:00:00.000001", "A", "a@x.com");
        assert!(new.is_newer_than(&old));
        assert!(!old.is_newer_than(&new));
    }
}
