use crate::app::{App, TextInput, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod add_task;
mod confirm_delete;
mod login;
mod tasks;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Apply a plain editing key to `input`. Returns false if the key is not an edit.
fn edit_text_input(key: KeyEvent, input: &mut TextInput) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => {
                app.quit();
                return;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                app.toggle_theme();
                return;
            }
            _ => {}
        }
    }

    match app.current_view {
        View::Login => login::handle_login_key(key, app, action_tx),
        View::Tasks => tasks::handle_tasks_key(key, app, action_tx),
        View::AddTask => add_task::handle_add_task_key(key, app, action_tx),
        View::ConfirmDelete => confirm_delete::handle_confirm_delete_key(key, app, action_tx),
    }
}
