use super::utils::centered_rect;
use super::*;

pub fn render_delete_confirm_dialog(frame: &mut Frame, app: &App, palette: &Palette) {
    let title = app
        .delete_context
        .as_ref()
        .map(|ctx| ctx.title.clone())
        .unwrap_or_default();

    let area = centered_rect(52, 8, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(title, Style::default().fg(palette.foreground))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(palette.error)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(palette.foreground)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .style(Style::default().bg(palette.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(" Delete Task? ")
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
