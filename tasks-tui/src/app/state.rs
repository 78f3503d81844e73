#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Tasks,
    AddTask,
    ConfirmDelete,
}

impl View {
    /// Route the view lives under; dialogs belong to the tasks page.
    pub fn route(self) -> &'static str {
        match self {
            View::Login => "/",
            View::Tasks | View::AddTask | View::ConfirmDelete => "/tasks",
        }
    }

    pub fn is_protected(self) -> bool {
        self != View::Login
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTaskField {
    Title,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Tasks,
    Calendar,
}

/// Which tasks the list pane shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    SelectedDay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteContext {
    pub task_id: i64,
    pub title: String,
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }
    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos;
        loop {
            p -= 1;
            if self.value.is_char_boundary(p) {
                return p;
            }
        }
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p <= self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub username: TextInput,
    pub password: TextInput,
    pub focused_field: LoginField,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            username: TextInput::new(),
            password: TextInput::new(),
            focused_field: LoginField::Username,
            error: None,
        }
    }
}

impl LoginForm {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.error = None;
    }

    /// After a successful registration: back to login with the username kept.
    pub fn switch_to_login(&mut self) {
        self.mode = AuthMode::Login;
        self.password.clear();
        self.focused_field = LoginField::Password;
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddTaskForm {
    pub title: TextInput,
    pub time: TextInput,
    pub focused_field: AddTaskField,
    pub error: Option<String>,
}

impl Default for AddTaskForm {
    fn default() -> Self {
        Self {
            title: TextInput::new(),
            time: TextInput::new(),
            focused_field: AddTaskField::Title,
            error: None,
        }
    }
}

impl AddTaskForm {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            AddTaskField::Title => &mut self.title,
            AddTaskField::Time => &mut self.time,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            AddTaskField::Title => AddTaskField::Time,
            AddTaskField::Time => AddTaskField::Title,
        };
    }
}
