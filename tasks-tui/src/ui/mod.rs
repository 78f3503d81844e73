use crate::app::{App, View};
use crate::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

mod add_task_dialog;
mod calendar_panel;
mod delete_dialog;
mod login_view;
mod tasks_view;
pub(super) mod utils;
pub(super) mod widgets;

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(palette.background)
                .fg(palette.foreground),
        ),
        frame.area(),
    );

    let body = frame.area();
    match app.current_view {
        View::Login => login_view::render_login_view(frame, app, &palette, body),
        View::Tasks => tasks_view::render_tasks_view(frame, app, &palette, body),
        View::AddTask => {
            tasks_view::render_tasks_view(frame, app, &palette, body);
            add_task_dialog::render_add_task_dialog(frame, app, &palette);
        }
        View::ConfirmDelete => {
            tasks_view::render_tasks_view(frame, app, &palette, body);
            delete_dialog::render_delete_confirm_dialog(frame, app, &palette);
        }
    }
}
