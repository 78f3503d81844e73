use tasks_api::NewTask;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Work that talks to the backend. Key handlers enqueue these; the event loop
/// runs them one at a time, in order.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    SubmitAuth,
    LoadTasks,
    CreateTask(NewTask),
    ToggleTask { id: i64 },
    DeleteTask { id: i64 },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
