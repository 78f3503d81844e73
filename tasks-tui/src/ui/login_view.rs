use super::utils::centered_rect;
use super::widgets::input_text;
use super::*;
use crate::app::{AuthMode, LoginField};

pub fn render_login_view(frame: &mut Frame, app: &App, palette: &Palette, body: Rect) {
    let form = &app.login_form;
    let (title, submit_label, switch_label) = match form.mode {
        AuthMode::Login => (" Log in ", "Log in", "Create an account"),
        AuthMode::Register => (" Register ", "Register", "Back to log in"),
    };

    let label_style = |field: LoginField| {
        if form.focused_field == field {
            Style::default().fg(palette.accent)
        } else {
            Style::default().fg(palette.muted)
        }
    };
    let value_style = |field: LoginField| {
        let style = Style::default().fg(palette.foreground);
        if form.focused_field == field {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Tasks",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Username: ", label_style(LoginField::Username)),
            Span::styled(
                input_text(
                    &form.username,
                    form.focused_field == LoginField::Username,
                    false,
                ),
                value_style(LoginField::Username),
            ),
        ]),
        Line::from(vec![
            Span::styled("Password: ", label_style(LoginField::Password)),
            Span::styled(
                input_text(
                    &form.password,
                    form.focused_field == LoginField::Password,
                    true,
                ),
                value_style(LoginField::Password),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(palette.error),
        )));
        lines.push(Line::from(""));
    } else if let Some(status) = &app.status_message {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(palette.completed),
        )));
        lines.push(Line::from(""));
    }

    let key = Style::default().fg(palette.accent);
    lines.push(Line::from(vec![
        Span::styled("Tab", key),
        Span::raw(": Switch field  "),
        Span::styled("Enter", key),
        Span::raw(format!(": {}", submit_label)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Ctrl+R", key),
        Span::raw(format!(": {}  ", switch_label)),
        Span::styled("Esc", key),
        Span::raw(": Quit"),
    ]));

    let area = centered_rect(56, 15, body);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(palette.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(title)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(paragraph, area);
}
