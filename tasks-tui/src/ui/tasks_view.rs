use super::widgets::task_row;
use super::*;
use crate::app::{FocusedPane, TaskScope};
use crate::time_utils::format_date;
use ratatui::widgets::{List, ListItem, ListState};

pub fn render_tasks_view(frame: &mut Frame, app: &mut App, palette: &Palette, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(10),   // Task list + calendar
            Constraint::Length(1), // Status
            Constraint::Length(2), // Controls
        ])
        .split(body);

    render_header(frame, chunks[0], app, palette);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(26)])
        .split(chunks[1]);
    render_task_list(frame, panes[0], app, palette);
    super::calendar_panel::render_calendar_panel(frame, panes[1], app, palette);

    render_status(frame, chunks[2], app, palette);
    render_controls(frame, chunks[3], palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let throbber_area = Rect {
        x: area.x + 1,
        y: area.y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 2,
        y: area.y,
        width: area.width.saturating_sub(3),
        height: 1,
    };

    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(palette.accent))
        .throbber_style(Style::default().fg(palette.accent))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);

    let counts = if app.tasks.is_empty() {
        "no tasks".to_string()
    } else {
        format!("{} open of {}", app.tasks.pending_count(), app.tasks.len())
    };
    let label = Line::from(vec![
        Span::styled(
            "Tasks",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.current_view.route()),
            Style::default().fg(palette.muted),
        ),
        Span::styled(
            format!("  {}  ·  {} theme", counts, app.theme.mode().storage_value()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(label), label_area);
}

fn render_task_list(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let is_focused = app.focused_pane == FocusedPane::Tasks;
    let title = match app.scope {
        TaskScope::All => " All tasks ".to_string(),
        TaskScope::SelectedDay => format!(" Due {} ", format_date(app.selected_date)),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.border)
        })
        .title(title)
        .padding(Padding::horizontal(1));

    let visible = app.visible_tasks();
    if visible.is_empty() {
        let empty = match app.scope {
            TaskScope::All => "No tasks yet. Press a to add one.",
            TaskScope::SelectedDay => "Nothing due on this day.",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(empty, Style::default().fg(palette.muted))).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            ListItem::new(task_row(
                task,
                palette,
                is_focused && idx == app.focused_task_index,
            ))
        })
        .collect();

    let mut state = ListState::default().with_selected(Some(app.focused_task_index));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(status) = &app.status_message else {
        return;
    };
    let style = if status.starts_with("Failed") {
        Style::default().fg(palette.error)
    } else {
        Style::default().fg(palette.completed)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status.as_str(), style))
            .block(Block::default().padding(Padding::horizontal(1))),
        area,
    );
}

fn render_controls(frame: &mut Frame, area: Rect, palette: &Palette) {
    let key = Style::default().fg(palette.accent);
    let text = Style::default().fg(palette.muted);
    let lines = vec![
        Line::from(vec![
            Span::styled("j/k", key),
            Span::styled(": Move  ", text),
            Span::styled("Space", key),
            Span::styled(": Done  ", text),
            Span::styled("a", key),
            Span::styled(": Add  ", text),
            Span::styled("d", key),
            Span::styled(": Delete  ", text),
            Span::styled("f", key),
            Span::styled(": All/day  ", text),
            Span::styled("r", key),
            Span::styled(": Reload", text),
        ]),
        Line::from(vec![
            Span::styled("Tab", key),
            Span::styled(": Calendar  ", text),
            Span::styled("[/]", key),
            Span::styled(": Month  ", text),
            Span::styled("g", key),
            Span::styled(": Today  ", text),
            Span::styled("t", key),
            Span::styled(": Theme  ", text),
            Span::styled("L", key),
            Span::styled(": Log out  ", text),
            Span::styled("q", key),
            Span::styled(": Quit", text),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default()),
        area,
    );
}
