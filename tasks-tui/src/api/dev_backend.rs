use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tasks_api::{
    format_due_date, Credentials, LoginResponse, MessageResponse, NewTask, Task, TaskUpdate,
    TasksApiError,
};
use time::{Duration, PrimitiveDateTime, Time};

use super::{ApiResult, TaskBackend};
use crate::time_utils::local_today;

/// In-memory stand-in for the tasks service, used by `tasks-tui dev`.
#[derive(Debug, Clone)]
pub struct DevBackend {
    state: Arc<Mutex<DevState>>,
}

#[derive(Debug)]
struct DevState {
    users: HashMap<String, String>,
    tasks: Vec<Task>,
    next_id: i64,
}

fn rejected(status: u16, message: &str) -> TasksApiError {
    TasksApiError::Rejected {
        status,
        message: message.to_string(),
    }
}

impl DevBackend {
    pub fn new() -> Self {
        let tasks = seed_dev_tasks();
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(DevState {
                users: HashMap::new(),
                tasks,
                next_id,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, DevState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_token(token: &str) -> ApiResult<()> {
        if token.is_empty() {
            return Err(TasksApiError::Unauthorized);
        }
        Ok(())
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskBackend for DevBackend {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(rejected(400, "Missing username or password"));
        }

        let state = self.state();
        // Unknown users are let in; registered users must match their password.
        if let Some(password) = state.users.get(&credentials.username) {
            if password != &credentials.password {
                return Err(rejected(401, "Invalid username or password"));
            }
        }

        Ok(LoginResponse {
            access_token: format!("dev-token-{}", credentials.username),
        })
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<MessageResponse> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(rejected(400, "Missing username or password"));
        }

        let mut state = self.state();
        if state.users.contains_key(&credentials.username) {
            return Err(rejected(400, "User already exists"));
        }
        state
            .users
            .insert(credentials.username.clone(), credentials.password.clone());

        Ok(MessageResponse {
            msg: Some("User created successfully".to_string()),
        })
    }

    async fn list_tasks(&self, token: &str) -> ApiResult<Vec<Task>> {
        Self::check_token(token)?;
        Ok(self.state().tasks.clone())
    }

    async fn create_task(&self, token: &str, task: &NewTask) -> ApiResult<()> {
        Self::check_token(token)?;
        if task.title.trim().is_empty() {
            return Err(rejected(400, "Title is required"));
        }

        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.tasks.push(Task {
            id,
            title: task.title.clone(),
            is_completed: false,
            due_date: task.due_date.map(format_due_date),
        });
        Ok(())
    }

    async fn update_task(&self, token: &str, id: i64, update: &TaskUpdate) -> ApiResult<()> {
        Self::check_token(token)?;
        let mut state = self.state();
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| rejected(404, "Task not found"))?;

        if let Some(is_completed) = update.is_completed {
            task.is_completed = is_completed;
        }
        Ok(())
    }

    async fn delete_task(&self, token: &str, id: i64) -> ApiResult<()> {
        Self::check_token(token)?;
        let mut state = self.state();
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        if state.tasks.len() == before {
            return Err(rejected(404, "Task not found"));
        }
        Ok(())
    }
}

fn seed_dev_tasks() -> Vec<Task> {
    let today = local_today();
    let at = |days: i64, hour: u8, minute: u8| {
        let date = today.checked_add(Duration::days(days)).unwrap_or(today);
        let time = Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);
        Some(format_due_date(PrimitiveDateTime::new(date, time)))
    };

    vec![
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            is_completed: false,
            due_date: at(0, 9, 30),
        },
        Task {
            id: 2,
            title: "Stand-up meeting".to_string(),
            is_completed: true,
            due_date: at(0, 10, 0),
        },
        Task {
            id: 3,
            title: "Book dentist appointment".to_string(),
            is_completed: false,
            due_date: at(1, 14, 0),
        },
        Task {
            id: 4,
            title: "Pay electricity bill".to_string(),
            is_completed: true,
            due_date: at(-3, 18, 0),
        },
        Task {
            id: 5,
            title: "Read a book".to_string(),
            is_completed: false,
            due_date: None,
        },
    ]
}
