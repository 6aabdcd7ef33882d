use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::UserRow;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
}

impl ApiError {
    /// Human-readable detail supplied by the server, when the failure
    /// carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Transport(_) => None,
        }
    }
}

/// Remote trigger that asks the backend to pull a user's latest posts
/// from LinkedIn on our behalf.
#[async_trait]
pub trait PostsFetcher: Send + Sync {
    async fn fetch_user_posts(&self, user_id: &str, cookie: &str) -> Result<(), ApiError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_users(&self, cohort_id: &str) -> Result<Vec<UserRow>, ApiError> {
        let url = format!("{}/cohorts/{cohort_id}/users", self.base_url);
        tracing::debug!(%url, "loading cohort users");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        let body: UsersResponse = response.json().await?;
        Ok(body.users)
    }
}

#[async_trait]
impl PostsFetcher for ApiClient {
    async fn fetch_user_posts(&self, user_id: &str, cookie: &str) -> Result<(), ApiError> {
        let url = format!("{}/users/{user_id}/fetch-posts", self.base_url);
        tracing::debug!(%url, "triggering post fetch");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "linkedinCookie": cookie }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct UsersResponse {
    users: Vec<UserRow>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);
    tracing::warn!(status = status.as_u16(), "backend request failed");
    ApiError::Status { status, detail }
}
