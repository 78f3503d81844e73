use super::*;
use crate::app::FocusedPane;
use crate::calendar::{self, DayMarker};
use crate::time_utils::format_date;
use ratatui::widgets::calendar::{CalendarEventStore, Monthly};
use time::Date;

fn add_style(events: &mut CalendarEventStore, date: Date, style: Style) {
    let entry = events.0.entry(date).or_default();
    *entry = entry.patch(style);
}

/// Day styles for the displayed month: task markers, today and the selected day.
fn build_events(app: &App, palette: &Palette) -> CalendarEventStore {
    let mut events = CalendarEventStore::default();

    for (date, marker) in calendar::month_markers(app.tasks.as_slice(), app.selected_date) {
        let color = match marker {
            DayMarker::AllCompleted => palette.completed,
            DayMarker::Pending => palette.pending,
            DayMarker::None => continue,
        };
        add_style(
            &mut events,
            date,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }

    add_style(
        &mut events,
        app.today,
        Style::default().add_modifier(Modifier::UNDERLINED),
    );
    add_style(
        &mut events,
        app.selected_date,
        Style::default().add_modifier(Modifier::REVERSED),
    );
    events
}

pub fn render_calendar_panel(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(area);

    let is_focused = app.focused_pane == FocusedPane::Calendar;
    let border_style = if is_focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.border)
    };

    let monthly = Monthly::new(app.selected_date, build_events(app, palette))
        .show_month_header(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .show_weekdays_header(Style::default().fg(palette.muted))
        .default_style(Style::default().fg(palette.foreground))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Calendar "),
        );
    frame.render_widget(monthly, chunks[0]);

    let due = calendar::tasks_for_date(app.tasks.as_slice(), app.selected_date);
    let pending = due.iter().filter(|task| !task.is_completed).count();
    let summary = vec![
        Line::from(Span::styled(
            format_date(app.selected_date),
            Style::default()
                .fg(palette.foreground)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} due, {} pending", due.len(), pending),
            Style::default().fg(palette.muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(palette.pending)),
            Span::styled("pending  ", Style::default().fg(palette.muted)),
            Span::styled("■ ", Style::default().fg(palette.completed)),
            Span::styled("done", Style::default().fg(palette.muted)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(summary).block(Block::default().padding(Padding::horizontal(1))),
        chunks[1],
    );
}
