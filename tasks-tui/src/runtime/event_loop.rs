use crate::api::TaskBackend;
use crate::app::App;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::action_queue::{channel, Action, ActionTx};
use super::actions::ActionRunner;
use super::views::handle_key;

const TICK: Duration = Duration::from_millis(100);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &dyn TaskBackend,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let mut runner = ActionRunner::new(api);

    if app.current_view.is_protected() {
        let _ = action_tx.send(Action::LoadTasks);
    }

    loop {
        if !runner.is_busy() {
            if let Ok(action) = action_rx.try_recv() {
                runner.start(action, app);
            }
        }
        app.is_loading = runner.is_busy();

        terminal.draw(|f| ui::render(f, app))?;

        if runner.is_busy() {
            // Keep drawing and reading keys while the request is out.
            runner.advance(app, TICK).await;
            app.throbber_state.calc_next();
            while event::poll(Duration::ZERO)? {
                dispatch_event(event::read()?, app, &action_tx);
            }
        } else if event::poll(TICK)? {
            dispatch_event(event::read()?, app, &action_tx);
        }

        if !app.running {
            break;
        }
    }

    if runner.is_busy() {
        tracing::debug!("quitting with a request still in flight");
    }
    Ok(())
}

fn dispatch_event(event: Event, app: &mut App, action_tx: &ActionTx) {
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            handle_key(key, app, action_tx);
        }
    }
}
