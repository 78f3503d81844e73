use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::{edit_text_input, enqueue_action};

pub(super) fn handle_login_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.login_form.toggle_mode();
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_form.next_field();
        }
        KeyCode::Enter => {
            app.login_form.error = None;
            enqueue_action(action_tx, Action::SubmitAuth);
        }
        KeyCode::Esc => app.quit(),
        _ => {
            if edit_text_input(key, app.login_form.focused_input()) {
                app.login_form.error = None;
            }
        }
    }
}
