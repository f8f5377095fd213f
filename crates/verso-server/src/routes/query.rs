//! Query endpoint.
//!
//! `GET /query` dispatches on the `operation` parameter. A missing or unknown
//! operation returns the catalogue of supported operations rather than an error.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verso_core::{QueryOperation, UserRecord, VersoError};

/// Query string accepted by `GET /query`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub operation: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub hours: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserQueryResponse {
    pub user: UserRecord,
    pub query_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailQueryResponse {
    pub users: Vec<UserRecord>,
    pub count: usize,
    pub query_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgeScanResponse {
    pub users: Vec<UserRecord>,
    pub count: usize,
    pub age_range: String,
    pub query_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub versions: Vec<UserRecord>,
    pub version_count: usize,
    pub query_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentUsersResponse {
    pub users: Vec<UserRecord>,
    pub count: usize,
    pub timeframe: String,
    pub cutoff_time: String,
    pub query_type: String,
}

/// One entry of the operation catalogue.
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationInfo {
    pub description: String,
    pub parameters: String,
    pub example: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationCatalogue {
    pub message: String,
    pub operations: BTreeMap<String, OperationInfo>,
}

/// Run a named read query.
/// GET /query
pub async fn query(
    State(state): State<AppState>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;

    let operation = match params.operation.as_deref().map(str::parse::<QueryOperation>) {
        Some(Ok(op)) => op,
        _ => return Ok(Json(catalogue()).into_response()),
    };
    let query_type = operation.query_type().to_string();

    let response = match operation {
        QueryOperation::QueryByUser => {
            let user_id = required(params.user_id.as_deref(), "user_id")?;
            let user = state.store.get_latest(user_id).await?;
            Json(UserQueryResponse { user, query_type }).into_response()
        }
        QueryOperation::QueryByEmail => {
            let email = required(params.email.as_deref(), "email")?;
            let users = state.store.query_by_email(email).await?;
            if users.is_empty() {
                return Err(VersoError::not_found_message("No users found with that email").into());
            }
            Json(EmailQueryResponse {
                count: users.len(),
                users,
                query_type,
            })
            .into_response()
        }
        QueryOperation::ScanByAge => {
            let scan = state
                .store
                .scan_by_age(params.min_age, params.max_age)
                .await?;
            Json(AgeScanResponse {
                count: scan.users.len(),
                age_range: format!("{}-{}", scan.min_age, scan.max_age),
                users: scan.users,
                query_type,
            })
            .into_response()
        }
        QueryOperation::QueryUserHistory => {
            let user_id = required(params.user_id.as_deref(), "user_id")?;
            let versions = state.store.query_history(user_id).await?;
            if versions.is_empty() {
                return Err(VersoError::not_found(user_id).into());
            }
            Json(HistoryResponse {
                user_id: user_id.to_string(),
                version_count: versions.len(),
                versions,
                query_type,
            })
            .into_response()
        }
        QueryOperation::QueryRecentUsers => {
            let recent = state.store.query_recent(params.hours).await?;
            Json(RecentUsersResponse {
                count: recent.users.len(),
                timeframe: format!("Last {} hours", recent.hours),
                cutoff_time: recent.cutoff_time,
                users: recent.users,
                query_type,
            })
            .into_response()
        }
    };

    Ok(response)
}

fn required<'a>(value: Option<&'a str>, name: &str) -> ApiResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::missing_param(name)),
    }
}

fn catalogue() -> OperationCatalogue {
    let operations = QueryOperation::iter()
        .map(|op| {
            (
                op.to_string(),
                OperationInfo {
                    description: op.description().to_string(),
                    parameters: op.parameters().to_string(),
                    example: op.example().to_string(),
                },
            )
        })
        .collect();

    OperationCatalogue {
        message: "Available query operations".to_string(),
        operations,
    }
}
