use super::utils::centered_rect;
use super::widgets::input_text;
use super::*;
use crate::app::AddTaskField;
use crate::time_utils::format_date;

pub fn render_add_task_dialog(frame: &mut Frame, app: &App, palette: &Palette) {
    let form = &app.add_task_form;
    let area = centered_rect(60, 12, frame.area());
    frame.render_widget(Clear, area);

    let field_style = |field: AddTaskField| {
        if form.focused_field == field {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.muted)
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date:  ", Style::default().fg(palette.muted)),
            Span::styled(
                format_date(app.selected_date),
                Style::default().fg(palette.foreground),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Title: ", field_style(AddTaskField::Title)),
            Span::styled(
                input_text(
                    &form.title,
                    form.focused_field == AddTaskField::Title,
                    false,
                ),
                Style::default().fg(palette.foreground),
            ),
        ]),
        Line::from(vec![
            Span::styled("Time:  ", field_style(AddTaskField::Time)),
            Span::styled(
                input_text(
                    &form.time,
                    form.focused_field == AddTaskField::Time,
                    false,
                ),
                Style::default().fg(palette.foreground),
            ),
            Span::styled("  HH:MM, empty for none", Style::default().fg(palette.muted)),
        ]),
        Line::from(""),
    ];

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(palette.error),
        )));
    } else {
        lines.push(Line::from(""));
    }

    let key = Style::default().fg(palette.accent);
    lines.push(Line::from(vec![
        Span::styled("Tab", key),
        Span::raw(": Switch field  "),
        Span::styled("Enter", key),
        Span::raw(": Add  "),
        Span::styled("Esc", key),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(palette.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" New Task ")
                .padding(Padding::uniform(1)),
        );
    frame.render_widget(paragraph, area);
}
