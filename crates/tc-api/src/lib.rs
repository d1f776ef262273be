//! TimeCamp REST API client.
//!
//! Fetches the two flat collections the core works on:
//! - `GET /tasks`: every task and project visible to the token
//! - `GET /entries`: recorded time entries for a date range
//!
//! The token travels in the URL path, so URLs built here must never be
//! logged or shown.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use url::Url;

use tc_core::{DATE_FORMAT, ProjectNode, Task, TaskId, TimeEntry, project_tree};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Public TimeCamp API endpoint.
pub const DEFAULT_API_URL: &str = "https://app.timecamp.com/third_party/api";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The API base URL or a derived URL could not be parsed.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Archived-only and active-only were both requested.
    #[error("at least one of active or archived tasks must be included")]
    ConflictingFilters,
    /// The requested date range is empty.
    #[error("from date {from} is after to date {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned a non-success status.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Where and as whom to talk to the API.
#[derive(Clone)]
pub struct Connection {
    api_url: Url,
    token: String,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("api_url", &self.api_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Connection {
    /// Creates a connection after validating the URL and token.
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "API token cannot be whitespace-only",
            });
        }
        if token.contains(['/', '?', '#']) {
            return Err(ApiError::InvalidToken {
                reason: "API token cannot contain URL delimiters",
            });
        }

        let api_url = Url::parse(api_url.trim_end_matches('/'))?;
        Ok(Self { api_url, token })
    }

    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// `{api_url}/{resource}/format/json/api_token/{token}{suffix}`
    fn endpoint(&self, resource: &str, suffix: &str) -> Result<Url, ApiError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{base}/{resource}/format/json/api_token/{}{suffix}",
            self.token
        ))?)
    }
}

/// Filters for `GET /tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskParams {
    pub only_archived: bool,
    pub only_active: bool,
}

/// Query for `GET /entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Restrict to these tasks; empty means all tasks.
    pub task_ids: Vec<TaskId>,
}

/// Builds the `GET /tasks` URL.
pub fn task_url(connection: &Connection, params: TaskParams) -> Result<Url, ApiError> {
    let exclude_archived = match (params.only_active, params.only_archived) {
        (true, true) => return Err(ApiError::ConflictingFilters),
        (true, false) => Some("0"),
        (false, true) => Some("1"),
        (false, false) => None,
    };

    let mut url = connection.endpoint("tasks", "")?;
    if let Some(value) = exclude_archived {
        url.query_pairs_mut().append_pair("exclude_archived", value);
    }
    Ok(url)
}

/// Builds the `GET /entries` URL.
pub fn time_entry_url(connection: &Connection, params: &TimeEntryParams) -> Result<Url, ApiError> {
    if params.from > params.to {
        return Err(ApiError::InvalidDateRange {
            from: params.from,
            to: params.to,
        });
    }

    let task_ids = params
        .task_ids
        .iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    let suffix = format!(
        "/from/{}/to/{}/task_ids/{task_ids}",
        params.from.format(DATE_FORMAT),
        params.to.format(DATE_FORMAT),
    );
    connection.endpoint("entries", &suffix)
}

/// TimeCamp API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    connection: Connection,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the given connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(connection: Connection) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self::with_http(http, connection))
    }

    fn with_http(http: reqwest::Client, connection: Connection) -> Self {
        Self { http, connection }
    }

    /// Fetches all tasks, ordered by ascending ID.
    ///
    /// Both projects and tasks are returned; see [`Task::is_project`].
    pub async fn get_tasks(&self, params: TaskParams) -> Result<Vec<Task>, ApiError> {
        let url = task_url(&self.connection, params)?;
        let body = self.get(url).await?;
        let tasks = parse_tasks(&body)?;
        tracing::debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    /// Fetches time entries for the requested range and tasks.
    pub async fn get_time_entries(
        &self,
        params: &TimeEntryParams,
    ) -> Result<Vec<TimeEntry>, ApiError> {
        let url = time_entry_url(&self.connection, params)?;
        let body = self.get(url).await?;
        let entries = parse_time_entries(&body)?;
        tracing::debug!(
            count = entries.len(),
            from = %params.from,
            to = %params.to,
            "fetched time entries"
        );
        Ok(entries)
    }

    /// Fetches tasks and groups them into sorted projects.
    pub async fn get_projects(&self, params: TaskParams) -> Result<Projects, ApiError> {
        let tasks = self.get_tasks(params).await?;
        Ok(Projects { tasks })
    }

    async fn get(&self, url: Url) -> Result<String, ApiError> {
        let response = self.http.get(url).send().await.map_err(strip_url)?;
        let status = response.status();
        let body = response.text().await.map_err(strip_url)?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Tasks fetched for a project listing.
#[derive(Debug, Clone)]
pub struct Projects {
    pub tasks: Vec<Task>,
}

impl Projects {
    /// Projects with their direct children, sorted by name.
    pub fn tree(&self) -> Vec<ProjectNode<'_>> {
        project_tree(&self.tasks)
    }
}

/// Drops the URL from request errors so the token cannot leak into messages.
fn strip_url(err: reqwest::Error) -> ApiError {
    ApiError::Request(err.without_url())
}

/// Decodes the `/tasks` response body.
///
/// Tasks are keyed by their ID; an account without tasks gets an empty array.
/// Keys are dropped and tasks come back ordered by ID.
fn parse_tasks(body: &str) -> Result<Vec<Task>, ApiError> {
    let invalid = |err: serde_json::Error| ApiError::InvalidResponse(err.to_string());
    let value: serde_json::Value = serde_json::from_str(body).map_err(invalid)?;
    let mut tasks: Vec<Task> = if value.is_array() {
        serde_json::from_value(value).map_err(invalid)?
    } else {
        serde_json::from_value::<HashMap<String, Task>>(value)
            .map_err(invalid)?
            .into_values()
            .collect()
    };
    tasks.sort_by(|a, b| compare_ids(&a.task_id, &b.task_id));
    Ok(tasks)
}

fn parse_time_entries(body: &str) -> Result<Vec<TimeEntry>, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

/// Numeric IDs in numeric order, anything else after them in string order.
fn compare_ids(a: &TaskId, b: &TaskId) -> Ordering {
    match (a.as_str().parse::<u64>(), b.as_str().parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
