//! Record store over the hosted REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use wall_core::domain::{NewPost, Post};
use wall_core::error::RepoError;
use wall_core::ports::PostRepository;
use wall_shared::RestError;

use crate::config::SupabaseConfig;

/// Posts table behind the REST API.
pub struct RestPostRepository {
    http: Client,
    config: Arc<SupabaseConfig>,
}

impl RestPostRepository {
    pub fn new(config: Arc<SupabaseConfig>) -> Result<Self, RepoError> {
        let headers = config.auth_headers().map_err(RepoError::Connection)?;
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(Self { http, config })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, RepoError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(error_for_status(status, &body))
        }
    }
}

/// Map a failed response to a repository error.
fn error_for_status(status: StatusCode, body: &str) -> RepoError {
    let error = RestError::from_body(body);
    let message = format!("{status}: {}", error.summary());

    if status == StatusCode::CONFLICT || error.is_constraint_violation() {
        RepoError::Constraint(message)
    } else if status.is_server_error() {
        RepoError::Connection(message)
    } else {
        RepoError::Query(message)
    }
}

fn decode_rows(body: &str) -> Result<Vec<Post>, RepoError> {
    serde_json::from_str(body).map_err(|e| RepoError::Decode(e.to_string()))
}

#[async_trait]
impl PostRepository for RestPostRepository {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let url = self.config.table_url().map_err(RepoError::Connection)?;
        tracing::debug!(table = %self.config.table, "Fetching posts");

        let response = self
            .http
            .get(url)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        decode_rows(&Self::read_body(response).await?)
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let url = self.config.table_url().map_err(RepoError::Connection)?;

        let response = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(&post)
            .send()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        decode_rows(&Self::read_body(response).await?)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Decode("insert returned no rows".to_string()))
    }
}
