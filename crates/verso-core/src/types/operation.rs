//! Named operations accepted by the batch and query endpoints.
//!
//! Both endpoints dispatch on an `operation` string. Keeping the names in
//! enums lets the server reject unknown names with the list of valid ones and
//! lets the query endpoint describe itself.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Operations accepted by `POST /batch`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BatchOperation {
    /// Create every user in `users`.
    BatchWrite,
    /// Fetch the latest version of every id in `user_ids`.
    BatchRead,
    /// Insert the built-in sample users.
    PopulateSampleData,
}

impl BatchOperation {
    /// All operation names, in declaration order.
    pub fn all_names() -> Vec<&'static str> {
        Self::iter().map(|op| op.into()).collect()
    }
}

/// Operations accepted by `GET /query`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueryOperation {
    QueryByUser,
    QueryByEmail,
    ScanByAge,
    QueryUserHistory,
    QueryRecentUsers,
}

impl QueryOperation {
    /// All operation names, in declaration order.
    pub fn all_names() -> Vec<&'static str> {
        Self::iter().map(|op| op.into()).collect()
    }

    /// Short description shown in the operation catalogue.
    pub fn description(&self) -> &'static str {
        match self {
            Self::QueryByUser => "Query specific user (latest version)",
            Self::QueryByEmail => "Query users by email using the secondary index",
            Self::ScanByAge => "Scan users by age range",
            Self::QueryUserHistory => "Get all versions of a user",
            Self::QueryRecentUsers => "Get users created in recent hours",
        }
    }

    /// Parameters the operation reads.
    pub fn parameters(&self) -> &'static str {
        match self {
            Self::QueryByUser | Self::QueryUserHistory => "user_id",
            Self::QueryByEmail => "email",
            Self::ScanByAge => "min_age, max_age (optional)",
            Self::QueryRecentUsers => "hours (default: 24)",
        }
    }

    /// Example request path.
    pub fn example(&self) -> &'static str {
        match self {
            Self::QueryByUser => "/query?operation=query_by_user&user_id=12345",
            Self::QueryByEmail => "/query?operation=query_by_email&email=john@example.com",
            Self::ScanByAge => "/query?operation=scan_by_age&min_age=25&max_age=35",
            Self::QueryUserHistory => "/query?operation=query_user_history&user_id=12345",
            Self::QueryRecentUsers => "/query?operation=query_recent_users&hours=12",
        }
    }

    /// Label reported alongside results.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::QueryByUser => "Primary Key Query",
            Self::QueryByEmail => "Global Secondary Index Query",
            Self::ScanByAge => "Scan with Filter Expression",
            Self::QueryUserHistory => "User History Query",
            Self::QueryRecentUsers => "Scan with Time Filter",
        }
    }
}
