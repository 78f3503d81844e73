use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::parse_due_date;

/// A task as returned by `GET /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Due date exactly as the server sent it. Use [`Task::due_at`] for the parsed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Task {
    /// Local wall-clock due date, if the task has one and it can be parsed.
    pub fn due_at(&self) -> Option<PrimitiveDateTime> {
        self.due_date.as_deref().and_then(parse_due_date)
    }
}

/// A task to be created. The server assigns the id and the completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<PrimitiveDateTime>,
}

/// Partial update sent with `PATCH /api/tasks/:id`. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskUpdate {
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Body shape used by the server for confirmations and errors alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct CreateTaskRequest<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}
