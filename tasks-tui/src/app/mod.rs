use crate::calendar;
use crate::session_store::{SessionStore, SharedStore};
use crate::theme::ThemeState;
use crate::time_utils::local_today;
use anyhow::{Context, Result};
use tasks_api::{NewTask, Task};
use time::Date;

mod navigation;
mod state;
mod task_list;
pub use state::{
    AddTaskField, AddTaskForm, AuthMode, DeleteContext, FocusedPane, LoginField, LoginForm,
    TaskScope, TextInput, View,
};
pub use task_list::TaskList;

const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub status_message: Option<String>,
    pub session: SessionStore,
    pub theme: ThemeState,

    // Tasks page
    pub tasks: TaskList,
    pub scope: TaskScope,
    pub focused_pane: FocusedPane,
    pub focused_task_index: usize,
    pub selected_date: Date,
    pub today: Date,

    // Forms
    pub login_form: LoginForm,
    pub add_task_form: AddTaskForm,

    // Delete confirmation
    pub delete_context: Option<DeleteContext>,

    // Loading indicator
    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    /// Protected pages need a stored token; without one the app opens on the login page.
    pub fn new(store: SharedStore, system_prefers_dark: bool) -> Self {
        let session = SessionStore::new(store.clone());
        let theme = ThemeState::load(store, system_prefers_dark);
        let current_view = if session.get().is_some() {
            View::Tasks
        } else {
            View::Login
        };
        let today = local_today();

        Self {
            running: true,
            current_view,
            status_message: None,
            session,
            theme,
            tasks: TaskList::default(),
            scope: TaskScope::All,
            focused_pane: FocusedPane::Tasks,
            focused_task_index: 0,
            selected_date: today,
            today,
            login_form: LoginForm::default(),
            add_task_form: AddTaskForm::default(),
            delete_context: None,
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.theme.toggle();
        self.set_status(format!("Switched to {} theme", mode.storage_value()));
    }

    /// Tasks shown in the list pane for the current scope, in server order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        match self.scope {
            TaskScope::All => self.tasks.as_slice().iter().collect(),
            TaskScope::SelectedDay => {
                calendar::tasks_for_date(self.tasks.as_slice(), self.selected_date)
            }
        }
    }

    pub fn focused_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.focused_task_index).copied()
    }

    pub fn toggle_scope(&mut self) {
        self.scope = match self.scope {
            TaskScope::All => TaskScope::SelectedDay,
            TaskScope::SelectedDay => TaskScope::All,
        };
        self.focused_task_index = 0;
    }

    /// Replace the local list with a fresh server copy.
    pub fn apply_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks.replace(tasks);
        self.clamp_task_focus();
    }

    /// Optimistically drop a task. Returns false when it was already gone.
    pub fn remove_task_local(&mut self, id: i64) -> bool {
        let removed = self.tasks.remove(id).is_some();
        self.clamp_task_focus();
        removed
    }

    /// Optimistically flip completion. Returns the new value.
    pub fn toggle_task_local(&mut self, id: i64) -> Option<bool> {
        self.tasks.toggle(id)
    }

    /// Store the token of a successful login and open the tasks page.
    pub fn complete_login(&mut self, token: &str) -> Result<()> {
        self.session.set(token).context("Failed to store session")?;
        self.login_form = LoginForm::default();
        self.navigate_to(View::Tasks);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        self.reset_tasks_page();
        self.login_form = LoginForm::default();
        self.navigate_to(View::Login);
        self.set_status("Logged out".to_string());
    }

    /// The server no longer accepts the token: forget it and go back to login.
    pub fn expire_session(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "failed to clear expired session");
        }
        self.reset_tasks_page();
        self.navigate_to(View::Login);
        self.login_form.error = Some(SESSION_EXPIRED.to_string());
    }

    /// No token at all: go to login without touching the server.
    pub fn redirect_to_login(&mut self) {
        self.reset_tasks_page();
        self.navigate_to(View::Login);
    }

    fn reset_tasks_page(&mut self) {
        self.tasks.clear();
        self.focused_task_index = 0;
        self.delete_context = None;
        self.add_task_form = AddTaskForm::default();
    }

    /// Populate delete_context from the focused task and switch to ConfirmDelete.
    pub fn enter_delete_confirm(&mut self) {
        let Some(task) = self.focused_task() else {
            return;
        };
        self.delete_context = Some(DeleteContext {
            task_id: task.id,
            title: task.title.clone(),
        });
        self.navigate_to(View::ConfirmDelete);
    }

    pub fn cancel_delete(&mut self) {
        self.delete_context = None;
        self.navigate_to(View::Tasks);
    }

    /// Open the add-task dialog. Input left over from a failed submit is kept.
    pub fn open_add_task(&mut self) {
        self.add_task_form.error = None;
        self.add_task_form.focused_field = AddTaskField::Title;
        self.navigate_to(View::AddTask);
    }

    /// Validate the add-task form. On failure the form carries the error.
    ///
    /// With a time entered the task is due on the selected calendar date at that
    /// time; without one it is unscheduled.
    pub fn build_new_task(&mut self) -> Option<NewTask> {
        let title = self.add_task_form.title.value.trim().to_string();
        if title.is_empty() {
            self.add_task_form.error = Some("Title is required".to_string());
            self.add_task_form.focused_field = AddTaskField::Title;
            return None;
        }

        let time_input = self.add_task_form.time.value.trim();
        let due_date = if time_input.is_empty() {
            None
        } else {
            match calendar::parse_time_of_day(time_input) {
                Ok(time_of_day) => Some(calendar::combine_date_and_time(
                    self.selected_date,
                    time_of_day,
                )),
                Err(e) => {
                    self.add_task_form.error = Some(e.to_string());
                    self.add_task_form.focused_field = AddTaskField::Time;
                    return None;
                }
            }
        };

        self.add_task_form.error = None;
        Some(NewTask { title, due_date })
    }
}
