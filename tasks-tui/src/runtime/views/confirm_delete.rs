use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_confirm_delete_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if let Some(ctx) = app.delete_context.take() {
                enqueue_action(action_tx, Action::DeleteTask { id: ctx.task_id });
            }
            app.navigate_to(View::Tasks);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.cancel_delete();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DeleteContext;
    use crate::session_store::MemoryStore;
    use std::sync::Arc;

    use super::super::super::action_queue::channel;

    fn confirming_app() -> App {
        let mut app = App::new(Arc::new(MemoryStore::new()), false);
        app.current_view = View::ConfirmDelete;
        app.delete_context = Some(DeleteContext {
            task_id: 3,
            title: "Pay bills".to_string(),
        });
        app
    }

    #[test]
    fn yes_enqueues_delete() {
        let mut app = confirming_app();
        let (tx, mut rx) = channel();

        handle_confirm_delete_key(KeyEvent::from(KeyCode::Char('y')), &mut app, &tx);

        assert_eq!(rx.try_recv().ok(), Some(Action::DeleteTask { id: 3 }));
        assert_eq!(app.current_view, View::Tasks);
        assert!(app.delete_context.is_none());
    }

    #[test]
    fn escape_cancels() {
        let mut app = confirming_app();
        let (tx, mut rx) = channel();

        handle_confirm_delete_key(KeyEvent::from(KeyCode::Esc), &mut app, &tx);

        assert!(rx.try_recv().is_err());
        assert_eq!(app.current_view, View::Tasks);
        assert!(app.delete_context.is_none());
    }
}
