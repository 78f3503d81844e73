use crate::app::{AddTaskField, App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::{edit_text_input, enqueue_action};

pub(super) fn handle_add_task_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Esc => app.navigate_to(View::Tasks),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.add_task_form.next_field();
        }
        KeyCode::Enter => {
            if let Some(task) = app.build_new_task() {
                enqueue_action(action_tx, Action::CreateTask(task));
            }
        }
        // The time field only takes HH:MM characters.
        KeyCode::Char(c)
            if app.add_task_form.focused_field == AddTaskField::Time
                && !(c.is_ascii_digit() || c == ':') => {}
        _ => {
            if edit_text_input(key, app.add_task_form.focused_input()) {
                app.add_task_form.error = None;
            }
        }
    }
}
