//! Batch endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verso_core::{BatchFailure, BatchOperation, ErrorCode, UserRecord, VersoError};

/// Request body for `POST /batch`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    pub operation: Option<String>,
    /// Entries for `batch_write`, decoded one at a time.
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
    /// Ids for `batch_read`.
    #[serde(default)]
    pub user_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchWriteResponse {
    pub message: String,
    pub users: Vec<UserRecord>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReadResponse {
    pub found_users: Vec<UserRecord>,
    pub not_found_users: Vec<String>,
    pub total_requested: usize,
    pub total_found: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SampleDataResponse {
    pub message: String,
    pub users: Vec<UserRecord>,
}

/// Dispatch a batch operation.
/// POST /batch
pub async fn batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let operation = parse_operation(request.operation.as_deref())?;

    match operation {
        BatchOperation::BatchWrite => {
            let outcome = state.store.batch_create_json(request.users).await?;
            if outcome.created.is_empty() {
                return Err(ApiError::new(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValInvalidInput.as_str(),
                    "No users were created",
                )
                .with_details(json!({ "failed": outcome.failed })));
            }

            let body = BatchWriteResponse {
                message: format!("Successfully created {} users", outcome.created.len()),
                users: outcome.created,
                failed: outcome.failed,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        BatchOperation::BatchRead => {
            let outcome = state.store.batch_get(request.user_ids).await?;
            let body = BatchReadResponse {
                total_requested: outcome.total_requested(),
                total_found: outcome.found.len(),
                found_users: outcome.found,
                not_found_users: outcome.not_found,
            };
            Ok(Json(body).into_response())
        }
        BatchOperation::PopulateSampleData => {
            let users = state.store.populate_sample_data().await?;
            let body = SampleDataResponse {
                message: format!(
                    "Successfully populated table with {} sample users",
                    users.len()
                ),
                users,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
    }
}

fn parse_operation(name: Option<&str>) -> Result<BatchOperation, VersoError> {
    let name = name.unwrap_or_default();
    name.parse()
        .map_err(|_| VersoError::unsupported(name, BatchOperation::all_names()))
}
