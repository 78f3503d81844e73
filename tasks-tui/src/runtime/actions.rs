use crate::api::{ApiResult, TaskBackend};
use crate::app::{App, AuthMode, View};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tasks_api::{Credentials, LoginResponse, MessageResponse, Task, TaskUpdate, TasksApiError};

use super::action_queue::Action;

/// A backend call in flight. It owns its inputs and borrows only the backend,
/// so the app stays free for drawing and key handling while it runs.
type PendingCall<'a> = Pin<Box<dyn Future<Output = Outcome> + Send + 'a>>;

/// What came back from the server, applied to the app by `finish_action`.
enum Outcome {
    LoggedIn {
        username: String,
        result: ApiResult<LoginResponse>,
    },
    Registered {
        username: String,
        result: ApiResult<MessageResponse>,
    },
    Loaded(ApiResult<Vec<Task>>),
    Created {
        title: String,
        result: ApiResult<()>,
    },
    Toggled {
        id: i64,
        result: ApiResult<()>,
    },
    Deleted {
        id: i64,
        result: ApiResult<()>,
    },
}

/// Runs queued actions one at a time without holding the app across awaits.
pub(super) struct ActionRunner<'a> {
    api: &'a dyn TaskBackend,
    pending: Option<PendingCall<'a>>,
}

impl<'a> ActionRunner<'a> {
    pub(super) fn new(api: &'a dyn TaskBackend) -> Self {
        Self { api, pending: None }
    }

    pub(super) fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the local part of `action` and start its backend call, if any.
    pub(super) fn start(&mut self, action: Action, app: &mut App) {
        tracing::debug!(?action, "running action");
        self.pending = start_action(action, app, self.api);
    }

    /// Wait for the pending call for at most `wait`. A finished call is
    /// applied to the app and its follow-up, if any, is started right away.
    pub(super) async fn advance(&mut self, app: &mut App, wait: Duration) {
        let Some(call) = self.pending.as_mut() else {
            return;
        };

        tokio::select! {
            outcome = call => {
                self.pending = None;
                if let Some(follow_up) = finish_action(outcome, app) {
                    self.start(follow_up, app);
                }
            }
            _ = tokio::time::sleep(wait) => {}
        }
    }
}

fn start_action<'a>(
    action: Action,
    app: &mut App,
    api: &'a dyn TaskBackend,
) -> Option<PendingCall<'a>> {
    match action {
        Action::SubmitAuth => start_auth(app, api),
        Action::LoadTasks => {
            let token = token_or_redirect(app)?;
            Some(Box::pin(async move {
                Outcome::Loaded(api.list_tasks(&token).await)
            }))
        }
        Action::CreateTask(task) => {
            let token = token_or_redirect(app)?;
            Some(Box::pin(async move {
                let result = api.create_task(&token, &task).await;
                Outcome::Created {
                    title: task.title,
                    result,
                }
            }))
        }
        Action::ToggleTask { id } => {
            let token = token_or_redirect(app)?;
            let Some(is_completed) = app.toggle_task_local(id) else {
                tracing::debug!(id, "toggle for unknown task dropped");
                return None;
            };
            Some(Box::pin(async move {
                let result = api
                    .update_task(&token, id, &TaskUpdate::completion(is_completed))
                    .await;
                Outcome::Toggled { id, result }
            }))
        }
        Action::DeleteTask { id } => {
            let token = token_or_redirect(app)?;
            // A repeated delete for an id that is already gone locally is coalesced.
            if !app.remove_task_local(id) {
                tracing::debug!(id, "delete for unknown task dropped");
                return None;
            }
            Some(Box::pin(async move {
                let result = api.delete_task(&token, id).await;
                Outcome::Deleted { id, result }
            }))
        }
    }
}

fn start_auth<'a>(app: &mut App, api: &'a dyn TaskBackend) -> Option<PendingCall<'a>> {
    let username = app.login_form.username.value.trim().to_string();
    let password = app.login_form.password.value.clone();
    if username.is_empty() || password.is_empty() {
        app.login_form.error = Some("Username and password are required".to_string());
        return None;
    }

    let credentials = Credentials::new(username, password);
    match app.login_form.mode {
        AuthMode::Login => Some(Box::pin(async move {
            let result = api.login(&credentials).await;
            Outcome::LoggedIn {
                username: credentials.username,
                result,
            }
        })),
        AuthMode::Register => Some(Box::pin(async move {
            let result = api.register(&credentials).await;
            Outcome::Registered {
                username: credentials.username,
                result,
            }
        })),
    }
}

/// Apply a finished call. Returns the action to run next, if any.
fn finish_action(outcome: Outcome, app: &mut App) -> Option<Action> {
    match outcome {
        Outcome::LoggedIn { username, result } => match result {
            Ok(response) => {
                if let Err(e) = app.complete_login(&response.access_token) {
                    tracing::warn!(error = %e, "failed to persist session");
                    app.login_form.error = Some(format!("{:#}", e));
                    return None;
                }
                tracing::info!(%username, "logged in");
                Some(Action::LoadTasks)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                app.login_form.error = Some(e.to_string());
                None
            }
        },
        Outcome::Registered { username, result } => {
            match result {
                Ok(response) => {
                    tracing::info!(
                        %username,
                        msg = response.msg.as_deref().unwrap_or_default(),
                        "registered"
                    );
                    app.login_form.switch_to_login();
                    app.set_status("Registration successful! Please log in.".to_string());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "registration failed");
                    app.login_form.error = Some(e.to_string());
                }
            }
            None
        }
        // The user logged out while the call was running.
        _ if app.session.get().is_none() => {
            tracing::debug!("dropping response for a closed session");
            None
        }
        Outcome::Loaded(result) => {
            match result {
                Ok(tasks) => {
                    tracing::debug!(count = tasks.len(), "tasks loaded");
                    app.apply_tasks(tasks);
                }
                // The server answered with an error status: nothing to show.
                Err(e @ TasksApiError::Rejected { .. }) => {
                    app.apply_tasks(Vec::new());
                    report_failure(app, "load tasks", e);
                }
                Err(e) => report_failure(app, "load tasks", e),
            }
            None
        }
        Outcome::Created { title, result } => match result {
            Ok(()) => {
                app.add_task_form = Default::default();
                if app.current_view == View::AddTask {
                    app.navigate_to(View::Tasks);
                }
                app.set_status(format!("Added \"{}\"", title));
                Some(Action::LoadTasks)
            }
            Err(TasksApiError::Unauthorized) => {
                report_failure(app, "add task", TasksApiError::Unauthorized);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "create task failed");
                app.add_task_form.error = Some(e.to_string());
                None
            }
        },
        Outcome::Toggled { id, result } => {
            let e = result.err()?;
            tracing::debug!(id, "toggle failed, restoring from server");
            refetch_after_failure(app, "update task", e)
        }
        Outcome::Deleted { id, result } => match result {
            Ok(()) => {
                tracing::debug!(id, "task deleted");
                app.set_status("Task deleted".to_string());
                None
            }
            Err(e) => refetch_after_failure(app, "delete task", e),
        },
    }
}

/// Token for a protected call. Without one the user is sent to login and
/// nothing is requested.
fn token_or_redirect(app: &mut App) -> Option<String> {
    let token = app.session.get();
    if token.is_none() {
        tracing::info!("no stored session, redirecting to login");
        app.redirect_to_login();
    }
    token
}

/// Turn a failed protected call into state: an expired session logs the
/// user out, anything else lands in the status line and the log.
fn report_failure(app: &mut App, what: &str, err: TasksApiError) {
    match err {
        TasksApiError::Unauthorized => {
            tracing::info!(call = what, "session rejected by server, logging out");
            app.expire_session();
        }
        other => {
            tracing::warn!(call = what, error = %other, "request failed");
            app.set_status(format!("Failed to {}: {}", what, other));
        }
    }
}

/// An optimistic edit failed. Unless the session expired, reload the list so
/// it matches the server again.
fn refetch_after_failure(app: &mut App, what: &str, err: TasksApiError) -> Option<Action> {
    let expired = err == TasksApiError::Unauthorized;
    report_failure(app, what, err);
    (!expired).then_some(Action::LoadTasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TextInput;
    use crate::runtime::action_queue::channel;
    use crate::runtime::views::handle_key;
    use crate::session_store::{MemoryStore, SessionStore, SharedStore};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::{Arc, Mutex};
    use tasks_api::NewTask;

    /// Backend with canned answers that records every call it sees.
    #[derive(Default)]
    struct StubBackend {
        tasks: Vec<Task>,
        list_error: Option<TasksApiError>,
        write_error: Option<TasksApiError>,
        /// Listing never answers, like a server that stopped responding.
        list_hangs: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn write_result(&self) -> ApiResult<()> {
            match &self.write_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl TaskBackend for StubBackend {
        async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
            self.record(format!("login {}", credentials.username));
            if credentials.password == "secret" {
                Ok(LoginResponse {
                    access_token: format!("token-{}", credentials.username),
                })
            } else {
                Err(TasksApiError::Rejected {
                    status: 401,
                    message: "Bad username or password".to_string(),
                })
            }
        }

        async fn register(&self, credentials: &Credentials) -> ApiResult<MessageResponse> {
            self.record(format!("register {}", credentials.username));
            Ok(MessageResponse::default())
        }

        async fn list_tasks(&self, token: &str) -> ApiResult<Vec<Task>> {
            self.record(format!("list {}", token));
            if self.list_hangs {
                std::future::pending::<()>().await;
            }
            match &self.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.tasks.clone()),
            }
        }

        async fn create_task(&self, _token: &str, task: &NewTask) -> ApiResult<()> {
            self.record(format!("create {}", task.title));
            self.write_result()
        }

        async fn update_task(&self, _token: &str, id: i64, update: &TaskUpdate) -> ApiResult<()> {
            self.record(format!("update {} {:?}", id, update.is_completed));
            self.write_result()
        }

        async fn delete_task(&self, _token: &str, id: i64) -> ApiResult<()> {
            self.record(format!("delete {}", id));
            self.write_result()
        }
    }

    fn task(id: i64, is_completed: bool) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            is_completed,
            due_date: None,
        }
    }

    fn is_completed(app: &App, id: i64) -> bool {
        app.tasks
            .as_slice()
            .iter()
            .any(|task| task.id == id && task.is_completed)
    }

    fn app_with_token(token: Option<&str>) -> App {
        let store: SharedStore = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            SessionStore::new(store.clone()).set(token).unwrap();
        }
        App::new(store, false)
    }

    /// Run an action and every follow-up it triggers to completion.
    async fn run_action(action: Action, app: &mut App, api: &dyn TaskBackend) {
        let mut runner = ActionRunner::new(api);
        runner.start(action, app);
        while runner.is_busy() {
            runner.advance(app, Duration::from_secs(1)).await;
        }
    }

    #[tokio::test]
    async fn login_stores_token_and_opens_tasks() {
        let api = StubBackend {
            tasks: vec![task(1, false)],
            ..Default::default()
        };
        let mut app = app_with_token(None);
        app.login_form.username = TextInput::from_str("alice");
        app.login_form.password = TextInput::from_str("secret");

        run_action(Action::SubmitAuth, &mut app, &api).await;

        assert_eq!(app.session.get().as_deref(), Some("token-alice"));
        assert_eq!(app.current_view, View::Tasks);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(api.calls(), vec!["login alice", "list token-alice"]);
    }

    #[tokio::test]
    async fn failed_login_shows_server_message() {
        let api = StubBackend::default();
        let mut app = app_with_token(None);
        app.login_form.username = TextInput::from_str("alice");
        app.login_form.password = TextInput::from_str("wrong");

        run_action(Action::SubmitAuth, &mut app, &api).await;

        assert_eq!(app.session.get(), None);
        assert_eq!(app.current_view, View::Login);
        assert_eq!(
            app.login_form.error.as_deref(),
            Some("Bad username or password")
        );
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_locally() {
        let api = StubBackend::default();
        let mut app = app_with_token(None);
        app.login_form.username = TextInput::from_str("alice");

        run_action(Action::SubmitAuth, &mut app, &api).await;

        assert!(api.calls().is_empty());
        assert_eq!(
            app.login_form.error.as_deref(),
            Some("Username and password are required")
        );
    }

    #[tokio::test]
    async fn registration_returns_to_login_mode() {
        let api = StubBackend::default();
        let mut app = app_with_token(None);
        app.login_form.toggle_mode();
        app.login_form.username = TextInput::from_str("bob");
        app.login_form.password = TextInput::from_str("pw");

        run_action(Action::SubmitAuth, &mut app, &api).await;

        assert_eq!(app.login_form.mode, AuthMode::Login);
        assert_eq!(app.session.get(), None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Registration successful! Please log in.")
        );
    }

    #[tokio::test]
    async fn unauthorized_list_clears_session() {
        let api = StubBackend {
            list_error: Some(TasksApiError::Unauthorized),
            ..Default::default()
        };
        let mut app = app_with_token(Some("stale"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::LoadTasks, &mut app, &api).await;

        assert_eq!(app.session.get(), None);
        assert_eq!(app.current_view, View::Login);
        assert!(app.tasks.is_empty());
    }

    #[tokio::test]
    async fn missing_token_redirects_without_fetching() {
        let api = StubBackend::default();
        let mut app = app_with_token(None);
        app.current_view = View::Tasks;

        run_action(Action::LoadTasks, &mut app, &api).await;

        assert!(api.calls().is_empty());
        assert_eq!(app.current_view, View::Login);
    }

    #[tokio::test]
    async fn transport_failure_keeps_current_list() {
        let api = StubBackend {
            list_error: Some(TasksApiError::ResponseError("connection refused".to_string())),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::LoadTasks, &mut app, &api).await;

        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.current_view, View::Tasks);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|s| s.starts_with("Failed to load tasks")));
    }

    #[tokio::test]
    async fn list_error_status_empties_list_and_shows_it() {
        let api = StubBackend {
            list_error: Some(TasksApiError::Rejected {
                status: 500,
                message: "Database unavailable".to_string(),
            }),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::LoadTasks, &mut app, &api).await;

        assert!(app.tasks.is_empty());
        assert_eq!(app.current_view, View::Tasks);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Failed to load tasks: Database unavailable")
        );
    }

    #[tokio::test]
    async fn create_resets_form_and_refetches() {
        let api = StubBackend {
            tasks: vec![task(7, false)],
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.current_view = View::AddTask;
        app.add_task_form.title = TextInput::from_str("Buy milk");
        let new_task = NewTask {
            title: "Buy milk".to_string(),
            due_date: None,
        };

        run_action(Action::CreateTask(new_task), &mut app, &api).await;

        assert_eq!(api.calls(), vec!["create Buy milk", "list t"]);
        assert_eq!(app.current_view, View::Tasks);
        assert!(app.add_task_form.title.value.is_empty());
        assert_eq!(app.tasks.as_slice()[0].id, 7);
    }

    #[tokio::test]
    async fn rejected_create_keeps_dialog_open() {
        let api = StubBackend {
            write_error: Some(TasksApiError::Rejected {
                status: 400,
                message: "Title is required".to_string(),
            }),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.current_view = View::AddTask;
        let new_task = NewTask {
            title: "x".to_string(),
            due_date: None,
        };

        run_action(Action::CreateTask(new_task), &mut app, &api).await;

        assert_eq!(app.current_view, View::AddTask);
        assert_eq!(app.add_task_form.error.as_deref(), Some("Title is required"));
    }

    #[tokio::test]
    async fn unauthorized_create_logs_out() {
        let api = StubBackend {
            write_error: Some(TasksApiError::Unauthorized),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.current_view = View::AddTask;
        let new_task = NewTask {
            title: "x".to_string(),
            due_date: None,
        };

        run_action(Action::CreateTask(new_task), &mut app, &api).await;

        assert_eq!(api.calls(), vec!["create x"]);
        assert_eq!(app.session.get(), None);
        assert_eq!(app.current_view, View::Login);
        assert_eq!(app.add_task_form.error, None);
    }

    #[tokio::test]
    async fn toggle_is_optimistic_and_sends_new_value() {
        let api = StubBackend::default();
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false), task(2, false)]);

        run_action(Action::ToggleTask { id: 1 }, &mut app, &api).await;
        run_action(Action::ToggleTask { id: 1 }, &mut app, &api).await;

        assert_eq!(api.calls(), vec!["update 1 Some(true)", "update 1 Some(false)"]);
        assert!(!is_completed(&app, 1));
        assert!(!is_completed(&app, 2));
    }

    #[tokio::test]
    async fn failed_toggle_refetches() {
        let api = StubBackend {
            tasks: vec![task(1, false)],
            write_error: Some(TasksApiError::ResponseError("timeout".to_string())),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::ToggleTask { id: 1 }, &mut app, &api).await;

        assert_eq!(api.calls(), vec!["update 1 Some(true)", "list t"]);
        assert!(!is_completed(&app, 1));
    }

    #[tokio::test]
    async fn unauthorized_toggle_logs_out() {
        let api = StubBackend {
            tasks: vec![task(1, false)],
            write_error: Some(TasksApiError::Unauthorized),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::ToggleTask { id: 1 }, &mut app, &api).await;

        assert_eq!(api.calls(), vec!["update 1 Some(true)"]);
        assert_eq!(app.session.get(), None);
        assert_eq!(app.current_view, View::Login);
        assert!(app.tasks.is_empty());
    }

    #[tokio::test]
    async fn duplicate_delete_is_coalesced() {
        let api = StubBackend::default();
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false), task(2, true)]);

        run_action(Action::DeleteTask { id: 1 }, &mut app, &api).await;
        run_action(Action::DeleteTask { id: 1 }, &mut app, &api).await;

        assert_eq!(api.calls(), vec!["delete 1"]);
        let ids: Vec<i64> = app.tasks.as_slice().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn unauthorized_delete_logs_out() {
        let api = StubBackend {
            write_error: Some(TasksApiError::Unauthorized),
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        app.apply_tasks(vec![task(1, false)]);

        run_action(Action::DeleteTask { id: 1 }, &mut app, &api).await;

        assert_eq!(api.calls(), vec!["delete 1"]);
        assert_eq!(app.session.get(), None);
        assert_eq!(app.current_view, View::Login);
    }

    #[tokio::test]
    async fn quit_key_works_while_a_call_hangs() {
        let api = StubBackend {
            list_hangs: true,
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        let (action_tx, _action_rx) = channel();
        let mut runner = ActionRunner::new(&api);

        runner.start(Action::LoadTasks, &mut app);
        tokio::time::timeout(
            Duration::from_secs(1),
            runner.advance(&mut app, Duration::from_millis(20)),
        )
        .await
        .expect("waiting on a hung call should give control back");
        assert!(runner.is_busy());

        handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
            &action_tx,
        );

        assert!(!app.running);
        assert_eq!(api.calls(), vec!["list t"]);
    }

    #[tokio::test]
    async fn response_after_logout_is_dropped() {
        let api = StubBackend {
            tasks: vec![task(1, false)],
            ..Default::default()
        };
        let mut app = app_with_token(Some("t"));
        let mut runner = ActionRunner::new(&api);

        runner.start(Action::LoadTasks, &mut app);
        app.logout();
        while runner.is_busy() {
            runner.advance(&mut app, Duration::from_secs(1)).await;
        }

        assert_eq!(api.calls(), vec!["list t"]);
        assert!(app.tasks.is_empty());
        assert_eq!(app.current_view, View::Login);
    }
}
