use async_trait::async_trait;
use tasks_api::{
    Credentials, LoginResponse, MessageResponse, NewTask, Task, TaskUpdate, TasksApiError,
    TasksClient,
};

mod dev_backend;

pub use dev_backend::DevBackend;

pub type ApiResult<T> = Result<T, TasksApiError>;

/// Everything the terminal client needs from the tasks service.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;
    async fn register(&self, credentials: &Credentials) -> ApiResult<MessageResponse>;
    async fn list_tasks(&self, token: &str) -> ApiResult<Vec<Task>>;
    async fn create_task(&self, token: &str, task: &NewTask) -> ApiResult<()>;
    async fn update_task(&self, token: &str, id: i64, update: &TaskUpdate) -> ApiResult<()>;
    async fn delete_task(&self, token: &str, id: i64) -> ApiResult<()>;
}

#[async_trait]
impl TaskBackend for TasksClient {
    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        TasksClient::login(self, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> ApiResult<MessageResponse> {
        TasksClient::register(self, credentials).await
    }

    async fn list_tasks(&self, token: &str) -> ApiResult<Vec<Task>> {
        TasksClient::list_tasks(self, token).await
    }

    async fn create_task(&self, token: &str, task: &NewTask) -> ApiResult<()> {
        TasksClient::create_task(self, token, task).await
    }

    async fn update_task(&self, token: &str, id: i64, update: &TaskUpdate) -> ApiResult<()> {
        TasksClient::update_task(self, token, id, update).await
    }

    async fn delete_task(&self, token: &str, id: i64) -> ApiResult<()> {
        TasksClient::delete_task(self, token, id).await
    }
}
