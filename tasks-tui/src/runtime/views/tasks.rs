use crate::app::{App, FocusedPane, TaskScope};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_tasks_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    // Keys that work the same in both panes.
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.quit();
            return;
        }
        KeyCode::Char('L') => {
            app.logout();
            return;
        }
        KeyCode::Char('r') => {
            enqueue_action(action_tx, Action::LoadTasks);
            return;
        }
        KeyCode::Char('t') => {
            app.toggle_theme();
            return;
        }
        KeyCode::Char('a') => {
            app.open_add_task();
            return;
        }
        KeyCode::Char('f') => {
            app.toggle_scope();
            return;
        }
        KeyCode::Char('g') => {
            app.select_today();
            return;
        }
        KeyCode::Char('[') => {
            app.shift_selected_months(-1);
            return;
        }
        KeyCode::Char(']') => {
            app.shift_selected_months(1);
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focused_pane();
            return;
        }
        _ => {}
    }

    match app.focused_pane {
        FocusedPane::Tasks => handle_task_list_key(key, app, action_tx),
        FocusedPane::Calendar => handle_calendar_key(key, app),
    }
}

fn handle_task_list_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.task_focus_down(),
        KeyCode::Up | KeyCode::Char('k') => app.task_focus_up(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(id) = app.focused_task().map(|task| task.id) {
                enqueue_action(action_tx, Action::ToggleTask { id });
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => app.enter_delete_confirm(),
        _ => {}
    }
}

fn handle_calendar_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => app.shift_selected_days(-1),
        KeyCode::Right | KeyCode::Char('l') => app.shift_selected_days(1),
        KeyCode::Up | KeyCode::Char('k') => app.shift_selected_days(-7),
        KeyCode::Down | KeyCode::Char('j') => app.shift_selected_days(7),
        KeyCode::Enter => {
            app.scope = TaskScope::SelectedDay;
            app.focused_task_index = 0;
            app.focused_pane = FocusedPane::Tasks;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use crate::session_store::{MemoryStore, SessionStore, SharedStore};
    use std::sync::Arc;
    use tasks_api::Task;
    use time::macros::date;

    use super::super::super::action_queue::channel;

    fn tasks_app() -> App {
        let store: SharedStore = Arc::new(MemoryStore::new());
        SessionStore::new(store.clone()).set("token").unwrap();
        let mut app = App::new(store, false);
        app.apply_tasks(vec![
            Task {
                id: 1,
                title: "Buy milk".to_string(),
                is_completed: false,
                due_date: Some("2024-05-01T09:30:00".to_string()),
            },
            Task {
                id: 2,
                title: "Read".to_string(),
                is_completed: false,
                due_date: None,
            },
        ]);
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_tasks_key(KeyEvent::from(code), app, &tx);
        rx.try_recv().ok()
    }

    #[test]
    fn space_toggles_focused_task() {
        let mut app = tasks_app();

        assert_eq!(press(&mut app, KeyCode::Char('j')), None);
        assert_eq!(
            press(&mut app, KeyCode::Char(' ')),
            Some(Action::ToggleTask { id: 2 })
        );
    }

    #[test]
    fn d_asks_before_deleting() {
        let mut app = tasks_app();

        assert_eq!(press(&mut app, KeyCode::Char('d')), None);
        assert_eq!(app.current_view, View::ConfirmDelete);
        assert_eq!(app.delete_context.as_ref().map(|c| c.task_id), Some(1));
    }

    #[test]
    fn r_reloads() {
        let mut app = tasks_app();
        assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Action::LoadTasks));
    }

    #[test]
    fn calendar_keys_move_selected_date() {
        let mut app = tasks_app();
        app.selected_date = date!(2024 - 05 - 01);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Calendar);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_date, date!(2024 - 05 - 09));
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.selected_date, date!(2024 - 06 - 09));
    }

    #[test]
    fn enter_on_calendar_shows_that_day() {
        let mut app = tasks_app();
        app.selected_date = date!(2024 - 05 - 01);
        app.focused_pane = FocusedPane::Calendar;

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.scope, TaskScope::SelectedDay);
        assert_eq!(app.focused_pane, FocusedPane::Tasks);
        let ids: Vec<i64> = app.visible_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn logout_returns_to_login() {
        let mut app = tasks_app();

        press(&mut app, KeyCode::Char('L'));

        assert_eq!(app.current_view, View::Login);
        assert_eq!(app.session.get(), None);
        assert!(app.tasks.is_empty());
    }
}
