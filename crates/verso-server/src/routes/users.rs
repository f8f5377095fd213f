//! User CRUD endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;
use verso_core::{NewUser, UserPatch, UserRecord};

/// Response carrying a single user and a status message.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserRecord,
}

/// Response for fetching one user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserRecord,
}

/// Response for listing users.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserRecord>,
    pub count: usize,
}

/// Response for deleting a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub message: String,
    pub deleted_count: usize,
}

/// Create a user.
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserMessageResponse>)> {
    let Json(input) = payload?;
    let user = state.store.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserMessageResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// List the latest version of every user.
/// GET /users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = state.store.list_latest().await?;

    Ok(Json(UsersResponse {
        count: users.len(),
        users,
    }))
}

/// Get the latest version of a user.
/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.store.get_latest(&user_id).await?;
    Ok(Json(UserResponse { user }))
}

/// Append a new version of a user.
/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<UserMessageResponse>> {
    let Json(patch) = payload?;
    let user = state.store.update(&user_id, patch).await?;

    Ok(Json(UserMessageResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// Delete every version of a user.
/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DeleteUserResponse>> {
    let deleted_count = state.store.delete(&user_id).await?;

    Ok(Json(DeleteUserResponse {
        message: format!(
            "User deleted successfully. Removed {} versions.",
            deleted_count
        ),
        deleted_count,
    }))
}
