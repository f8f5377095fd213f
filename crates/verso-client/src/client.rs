//! Client for the verso REST API.

use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use verso_core::{
    AgeScan, BatchFailure, BatchReadOutcome, BatchWriteOutcome, NewUser, RecentUsers, UserPatch,
    UserRecord, VersoError, VersoResult,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client for the verso REST API.
#[derive(Debug, Clone)]
pub struct UsersClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Server status reported by `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
    pub record_count: u64,
    pub version: String,
}

#[derive(Deserialize)]
struct UserBody {
    user: UserRecord,
}

#[derive(Deserialize)]
struct UsersBody {
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct DeleteBody {
    deleted_count: usize,
}

#[derive(Deserialize)]
struct BatchWriteBody {
    users: Vec<UserRecord>,
    #[serde(default)]
    failed: Vec<BatchFailure>,
}

#[derive(Deserialize)]
struct BatchReadBody {
    found_users: Vec<UserRecord>,
    not_found_users: Vec<String>,
}

#[derive(Deserialize)]
struct AgeScanBody {
    users: Vec<UserRecord>,
    age_range: String,
}

#[derive(Deserialize)]
struct HistoryBody {
    versions: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct RecentBody {
    users: Vec<UserRecord>,
    timeframe: String,
    cutoff_time: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl UsersClient {
    /// Create a client for the server at `base_url`, without authentication.
    pub fn new(base_url: &str) -> Self {
        Self::with_options(Some(base_url), None)
    }

    /// Create a client with options.
    pub fn with_options(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.map(|s| s.to_string()),
        }
    }

    /// Create a client from `VERSO_BASE_URL` and `VERSO_API_KEY`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("VERSO_BASE_URL").ok();
        let api_key = std::env::var("VERSO_API_KEY").ok().filter(|k| !k.is_empty());

        Self::with_options(base_url.as_deref(), api_key.as_deref())
    }

    /// The server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// `/users/{user_id}` with the id as a single percent-encoded segment.
    fn user_url(&self, user_id: &str) -> VersoResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| VersoError::network(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| VersoError::network(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("users")
            .push(user_id);
        Ok(url)
    }

    async fn send(&self, builder: RequestBuilder) -> VersoResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| VersoError::network(format!("Request failed: {}", e)))?;

        debug!(status = %response.status(), url = %response.url(), "Response received");

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> VersoResult<T> {
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| VersoError::network(format!("Failed to parse response: {}", e)))
    }

    /// Create a user.
    pub async fn create(&self, input: &NewUser) -> VersoResult<UserRecord> {
        let body: UserBody = self
            .send_json(self.request(Method::POST, "/users").json(input))
            .await?;
        Ok(body.user)
    }

    /// Latest version of every user.
    pub async fn list(&self) -> VersoResult<Vec<UserRecord>> {
        let body: UsersBody = self.send_json(self.request(Method::GET, "/users")).await?;
        Ok(body.users)
    }

    /// Latest version of a user, or `None` if it has no versions.
    pub async fn get(&self, user_id: &str) -> VersoResult<Option<UserRecord>> {
        let url = self.user_url(user_id)?;
        match self.send_json::<UserBody>(self.request_url(Method::GET, url)).await {
            Ok(body) => Ok(Some(body.user)),
            Err(VersoError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Append a new version of a user.
    pub async fn update(&self, user_id: &str, patch: &UserPatch) -> VersoResult<UserRecord> {
        let url = self.user_url(user_id)?;
        let body: UserBody = self
            .send_json(self.request_url(Method::PUT, url).json(patch))
            .await?;
        Ok(body.user)
    }

    /// Delete every version of a user. Returns how many were removed.
    pub async fn delete(&self, user_id: &str) -> VersoResult<usize> {
        let url = self.user_url(user_id)?;
        let body: DeleteBody = self.send_json(self.request_url(Method::DELETE, url)).await?;
        Ok(body.deleted_count)
    }

    /// Create several users; entries that fail are reported, not fatal.
    pub async fn batch_write(&self, users: &[NewUser]) -> VersoResult<BatchWriteOutcome> {
        let request = self
            .request(Method::POST, "/batch")
            .json(&json!({ "operation": "batch_write", "users": users }));
        let body: BatchWriteBody = self.send_json(request).await?;

        Ok(BatchWriteOutcome {
            created: body.users,
            failed: body.failed,
        })
    }

    /// Latest version of each id.
    pub async fn batch_read(&self, user_ids: &[String]) -> VersoResult<BatchReadOutcome> {
        let request = self
            .request(Method::POST, "/batch")
            .json(&json!({ "operation": "batch_read", "user_ids": user_ids }));
        let body: BatchReadBody = self.send_json(request).await?;

        Ok(BatchReadOutcome {
            found: body.found_users,
            not_found: body.not_found_users,
        })
    }

    /// Insert the server's built-in sample users.
    pub async fn populate_sample_data(&self) -> VersoResult<Vec<UserRecord>> {
        let request = self
            .request(Method::POST, "/batch")
            .json(&json!({ "operation": "populate_sample_data" }));
        let body: UsersBody = self.send_json(request).await?;
        Ok(body.users)
    }

    /// Every version carrying `email`. Empty when none match.
    pub async fn query_by_email(&self, email: &str) -> VersoResult<Vec<UserRecord>> {
        let request = self
            .request(Method::GET, "/query")
            .query(&[("operation", "query_by_email"), ("email", email)]);
        match self.send_json::<UsersBody>(request).await {
            Ok(body) => Ok(body.users),
            Err(VersoError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Latest version per user within an age range. Bounds default on the server.
    pub async fn scan_by_age(
        &self,
        min_age: Option<i64>,
        max_age: Option<i64>,
    ) -> VersoResult<AgeScan> {
        let mut params = vec![("operation", "scan_by_age".to_string())];
        if let Some(min) = min_age {
            params.push(("min_age", min.to_string()));
        }
        if let Some(max) = max_age {
            params.push(("max_age", max.to_string()));
        }

        let body: AgeScanBody = self
            .send_json(self.request(Method::GET, "/query").query(&params))
            .await?;
        let (min_age, max_age) = parse_age_range(&body.age_range)?;

        Ok(AgeScan {
            min_age,
            max_age,
            users: body.users,
        })
    }

    /// Every version of a user, latest first. Empty when the user has none.
    pub async fn query_history(&self, user_id: &str) -> VersoResult<Vec<UserRecord>> {
        let request = self
            .request(Method::GET, "/query")
            .query(&[("operation", "query_user_history"), ("user_id", user_id)]);
        match self.send_json::<HistoryBody>(request).await {
            Ok(body) => Ok(body.versions),
            Err(VersoError::NotFound { .. }) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Users created in the last `hours` (server default when `None`).
    pub async fn query_recent(&self, hours: Option<i64>) -> VersoResult<RecentUsers> {
        let mut params = vec![("operation", "query_recent_users".to_string())];
        if let Some(hours) = hours {
            params.push(("hours", hours.to_string()));
        }

        let body: RecentBody = self
            .send_json(self.request(Method::GET, "/query").query(&params))
            .await?;

        Ok(RecentUsers {
            hours: parse_timeframe(&body.timeframe)?,
            cutoff_time: body.cutoff_time,
            users: body.users,
        })
    }

    /// Server status.
    pub async fn health(&self) -> VersoResult<HealthStatus> {
        self.send_json(self.request(Method::GET, "/health")).await
    }
}

async fn error_from_response(response: Response) -> VersoError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|e| e.error.message)
        .unwrap_or(text);

    match status {
        StatusCode::NOT_FOUND => VersoError::not_found_message(message),
        _ => VersoError::from_http_status(status.as_u16(), &message),
    }
}

fn parse_age_range(range: &str) -> VersoResult<(i64, i64)> {
    let bad = || VersoError::network(format!("Unexpected age_range '{}'", range));
    // Either bound may be negative, so skip a leading sign before splitting.
    let split = range
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i)
        .ok_or_else(bad)?;
    let (min, max) = (&range[..split], &range[split + 1..]);
    Ok((
        min.parse().map_err(|_| bad())?,
        max.parse().map_err(|_| bad())?,
    ))
}

fn parse_timeframe(timeframe: &str) -> VersoResult<i64> {
    timeframe
        .strip_prefix("Last ")
        .and_then(|rest| rest.strip_suffix(" hours"))
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| VersoError::network(format!("Unexpected timeframe '{}'", timeframe)))
}
