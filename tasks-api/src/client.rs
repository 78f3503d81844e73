use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::CreateTaskRequest;
use crate::{
    format_due_date, Credentials, LoginResponse, MessageResponse, NewTask, Task, TaskUpdate,
};

/// Shown when the server rejects a request without saying why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// HTTP client for the tasks backend.
///
/// Auth endpoints are public. Every task endpoint takes the bearer token of the
/// current session; an empty token sends the request without credentials.
#[derive(Debug, Clone)]
pub struct TasksClient {
    client: Client,
    base_url: Url,
}

impl TasksClient {
    /// `base_url` may carry a path prefix; endpoints are resolved below it.
    pub fn new(base_url: &str) -> Result<Self, TasksApiError> {
        let parsed = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| TasksApiError::Other(format!("Invalid API URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .build()
            .map_err(|e| TasksApiError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// `path` is relative so the prefix of `base_url` is kept.
    fn endpoint(&self, path: &str) -> Result<Url, TasksApiError> {
        self.base_url
            .join(path)
            .map_err(|e| TasksApiError::Other(format!("Failed to build URL for {}: {}", path, e)))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<Response, TasksApiError> {
        tracing::debug!(call = call_name, "sending request");

        request.send().await.map_err(|e| {
            tracing::warn!(call = call_name, error = %e, "request failed");
            TasksApiError::ResponseError(format!("Failed to call {}: {}", call_name, e))
        })
    }

    /// Map a protected endpoint's response to an error unless it succeeded.
    async fn check_protected(
        response: Response,
        call_name: &str,
    ) -> Result<Response, TasksApiError> {
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::info!(call = call_name, "server rejected the session token");
            return Err(TasksApiError::Unauthorized);
        }

        if !response.status().is_success() {
            return Err(Self::rejection(response, call_name).await);
        }

        Ok(response)
    }

    async fn rejection(response: Response, call_name: &str) -> TasksApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<MessageResponse>()
            .await
            .ok()
            .and_then(|body| body.msg)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

        tracing::warn!(call = call_name, status, %message, "request rejected");
        TasksApiError::Rejected { status, message }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: Response,
        call_name: &str,
    ) -> Result<T, TasksApiError> {
        response.json::<T>().await.map_err(|e| {
            TasksApiError::ParsingError(format!("Failed to parse {} response: {}", call_name, e))
        })
    }

    /// `POST /api/auth/login`. A rejected login carries the server's message.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, TasksApiError> {
        let call_name = "POST /api/auth/login";
        let response = self
            .send(
                self.client
                    .post(self.endpoint("api/auth/login")?)
                    .json(credentials),
                call_name,
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, call_name).await);
        }

        Self::parse_json(response, call_name).await
    }

    /// `POST /api/auth/register`. The confirmation body is optional.
    pub async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<MessageResponse, TasksApiError> {
        let call_name = "POST /api/auth/register";
        let response = self
            .send(
                self.client
                    .post(self.endpoint("api/auth/register")?)
                    .json(credentials),
                call_name,
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, call_name).await);
        }

        Ok(response.json::<MessageResponse>().await.unwrap_or_default())
    }

    /// `GET /api/tasks`.
    ///
    /// A 401 is `Unauthorized` and any other error status is `Rejected`. A
    /// successful response is decoded leniently: a body that is not a JSON array
    /// yields an empty list and array items that are not tasks are skipped.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, TasksApiError> {
        let call_name = "GET /api/tasks";
        let response = self
            .send(
                authorized(self.client.get(self.endpoint("api/tasks")?), token),
                call_name,
            )
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(call = call_name, "server rejected the session token");
            return Err(TasksApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::rejection(response, call_name).await);
        }

        let body = response.bytes().await.map_err(|e| {
            TasksApiError::ResponseError(format!("Failed to read {} response: {}", call_name, e))
        })?;

        Ok(decode_task_list(&body))
    }

    /// `POST /api/tasks`. The created task is not returned; refetch the list instead.
    pub async fn create_task(&self, token: &str, task: &NewTask) -> Result<(), TasksApiError> {
        let call_name = "POST /api/tasks";
        let body = CreateTaskRequest {
            title: &task.title,
            due_date: task.due_date.map(format_due_date),
        };
        let response = self
            .send(
                authorized(self.client.post(self.endpoint("api/tasks")?), token).json(&body),
                call_name,
            )
            .await?;

        let response = Self::check_protected(response, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    /// `PATCH /api/tasks/:id`.
    pub async fn update_task(
        &self,
        token: &str,
        id: i64,
        update: &TaskUpdate,
    ) -> Result<(), TasksApiError> {
        let call_name = "PATCH /api/tasks/:id";
        let response = self
            .send(
                authorized(
                    self.client
                        .patch(self.endpoint(&format!("api/tasks/{}", id))?),
                    token,
                )
                .json(update),
                call_name,
            )
            .await?;

        let response = Self::check_protected(response, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    /// `DELETE /api/tasks/:id`.
    pub async fn delete_task(&self, token: &str, id: i64) -> Result<(), TasksApiError> {
        let call_name = "DELETE /api/tasks/:id";
        let response = self
            .send(
                authorized(
                    self.client
                        .delete(self.endpoint(&format!("api/tasks/{}", id))?),
                    token,
                ),
                call_name,
            )
            .await?;

        let response = Self::check_protected(response, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }
}

fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
    if token.is_empty() {
        request
    } else {
        request.bearer_auth(token)
    }
}

fn decode_task_list(body: &[u8]) -> Vec<Task> {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "task list response is not JSON");
            return Vec::new();
        }
    };

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            tracing::warn!(payload = %other, "task list response is not an array");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed task");
                None
            }
        })
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TasksApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
    #[error("Other: {0}")]
    Other(String),
}
