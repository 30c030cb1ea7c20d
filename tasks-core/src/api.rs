//! HTTP access to the remote task collection.
//!
//! Four operations, one round-trip each, no retries. Transport failures and
//! server error statuses are both folded into [`ApiError`], so every caller
//! sees a single message shape.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{NewTask, Task, TaskPatch};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown when the server gives an error status with no usable message.
const UNKNOWN_ERROR: &str = "Ha ocurrido un error desconocido";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (connection refused,
    /// timeout, undecodable body).
    #[error("Error: {0}")]
    Transport(String),
    /// The server answered with an error status.
    #[error("Código de error: {status}, mensaje: {message}")]
    Server { status: u16, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Error bodies are expected to carry `{"message": "..."}`.
#[derive(Deserialize)]
struct ServerMessage {
    message: Option<String>,
}

/// The seam between the controller and the network.
#[async_trait]
pub trait TaskStore {
    async fn get_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: i64) -> Result<(), ApiError>;
}

pub struct TaskApi {
    client: Client,
    base_url: String,
}

impl TaskApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(TaskApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn task_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Passes successful responses through; turns error statuses into
    /// [`ApiError::Server`], preferring the body's `message` field over the
    /// canonical status text.
    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<ServerMessage>().await {
            Ok(ServerMessage { message: Some(m) }) if !m.is_empty() => m,
            _ => status
                .canonical_reason()
                .unwrap_or(UNKNOWN_ERROR)
                .to_string(),
        };
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TaskStore for TaskApi {
    async fn get_tasks(&self) -> Result<Vec<Task>, ApiError> {
        debug!(url = %self.base_url, "GET tasks");
        let resp = self.client.get(&self.base_url).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        debug!(title = %task.title, "POST task");
        let resp = self.client.post(&self.base_url).json(task).send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError> {
        debug!(id, "PUT task");
        let resp = self
            .client
            .put(self.task_url(id))
            .json(patch)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        debug!(id, "DELETE task");
        let resp = self.client.delete(self.task_url(id)).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}
