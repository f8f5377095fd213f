//! Write inputs for the user store.

use serde::{Deserialize, Serialize};

use super::record::UserRecord;
use crate::error::{VersoError, VersoResult};

/// Fields accepted when creating a user.
///
/// Required fields are optional at the type level so that a missing value
/// surfaces as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    /// Caller-chosen id; a fresh UUID is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewUser {
    /// Create an input with the two required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Default::default()
        }
    }

    /// Set an explicit user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
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

    /// Decode one raw JSON entry. A malformed entry is a validation error.
    pub fn from_value(value: serde_json::Value) -> VersoResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| VersoError::validation(format!("Invalid user entry: {}", e)))
    }

    /// Check that `name` and `email` are present and non-blank.
    pub fn validate(&self) -> VersoResult<()> {
        required(&self.name, "name")?;
        required(&self.email, "email")?;
        if let Some(id) = &self.user_id {
            if id.trim().is_empty() {
                return Err(VersoError::validation("user_id must not be empty"));
            }
        }
        Ok(())
    }

    /// Build the first physical record for this input.
    ///
    /// `created_at`, `updated_at` and the version key are all set to `timestamp`.
    pub fn into_record(self, user_id: String, timestamp: String) -> VersoResult<UserRecord> {
        self.validate()?;
        let name = self.name.unwrap_or_default();
        let email = self.email.unwrap_or_default();

        let mut record = UserRecord::new(user_id, timestamp, name, email);
        record.age = self.age.unwrap_or(0);
        record.phone = self.phone;
        record.address = self.address;
        Ok(record)
    }
}

fn required(value: &Option<String>, field: &str) -> VersoResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(VersoError::missing_field(field)),
    }
}

/// Fields accepted when updating a user. Absent fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UserPatch {
    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the age.
    pub fn age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    /// Set the phone number.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the postal address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Reject patches that would blank out a required field.
    pub fn validate(&self) -> VersoResult<()> {
        if matches!(&self.name, Some(n) if n.trim().is_empty()) {
            return Err(VersoError::missing_field("name"));
        }
        if matches!(&self.email, Some(e) if e.trim().is_empty()) {
            return Err(VersoError::missing_field("email"));
        }
        Ok(())
    }

    /// Overwrite the fields present in this patch.
    pub fn apply_to(&self, record: &mut UserRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(phone) = &self.phone {
            record.phone = Some(phone.clone());
        }
        if let Some(address) = &self.address {
            record.address = Some(address.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UserPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_missing_email_is_rejected() {
        let input = NewUser {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn test_from_value_rejects_mistyped_field() {
        let input = NewUser::from_value(serde_json::json!({ "name": "A", "email": "a@x.com" }));
        assert_eq!(input.unwrap(), NewUser::new("A", "a@x.com"));

        let err = NewUser::from_value(serde_json::json!({ "name": "A", "age": "old" }))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValInvalidInput);
        assert!(err.to_string().contains("Invalid user entry"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let input = NewUser::new("  ", "ada@x.com");
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_into_record_defaults_age() {
        let record = NewUser::new("Ada", "ada@x.com")
            .with_phone("+1")
            .into_record("u1".to_string(), "2024-01-01T00:00:00.000000".to_string())
            .unwrap();

        assert_eq!(record.age, 0);
        assert_eq!(record.phone.as_deref(), Some("+1"));
        assert_eq!(record.address, None);
        assert_eq!(record.created_at, record.timestamp);
        assert_eq!(record.updated_at, record.timestamp);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut record = UserRecord::new("u1", "t1", "Ada", "ada@x.com").with_phone("+1");
        UserPatch::default().age(36).apply_to(&mut record);

        assert_eq!(record.age, 36);
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, "ada@x.com");
        assert_eq!(record.phone.as_deref(), Some("+1"));
    }

    #[test]
    fn test_patch_ignores_key_fields() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"user_id":"other","timestamp":"x","name":"B"}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("B"));
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_cannot_blank_email() {
        assert!(UserPatch::default().email("").validate().is_err());
    }
}
