use crate::app::TextInput;
use crate::theme::Palette;
use crate::time_utils::format_due_label;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use tasks_api::Task;

/// Input text with a block cursor when focused; password fields are masked.
pub fn input_text(input: &TextInput, focused: bool, masked: bool) -> String {
    let mask = |s: &str| "•".repeat(s.chars().count());
    let (before, after) = input.split_at_cursor();
    let (before, after) = if masked {
        (mask(before), mask(after))
    } else {
        (before.to_string(), after.to_string())
    };

    if focused {
        format!("{}█{}", before, after)
    } else {
        format!("{}{}", before, after)
    }
}

/// One row of the task list: checkbox, title and due date.
pub fn task_row<'a>(task: &'a Task, palette: &Palette, is_focused: bool) -> Line<'a> {
    let (checkbox, status_color) = if task.is_completed {
        ("[x] ", palette.completed)
    } else {
        ("[ ] ", palette.pending)
    };

    let mut title_style = Style::default().fg(palette.foreground);
    if task.is_completed {
        title_style = title_style
            .fg(palette.muted)
            .add_modifier(Modifier::CROSSED_OUT);
    }

    let due = match (task.due_at(), task.due_date.as_deref()) {
        (Some(due), _) => format_due_label(due),
        // Unparsable dates are shown raw so nothing silently disappears.
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "no due date".to_string(),
    };

    let mut line = Line::from(vec![
        Span::styled(checkbox, Style::default().fg(status_color)),
        Span::styled(task.title.as_str(), title_style),
        Span::raw("  "),
        Span::styled(due, Style::default().fg(palette.muted)),
    ]);

    if is_focused {
        line = line.style(
            Style::default()
                .fg(palette.highlight_fg)
                .bg(palette.highlight_bg),
        );
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Palette, ThemeMode};

    #[test]
    fn masked_input_hides_characters() {
        let input = TextInput::from_str("pässword");
        assert_eq!(input_text(&input, false, true), "••••••••");
        assert_eq!(input_text(&input, true, true), "••••••••█");
    }

    #[test]
    fn cursor_is_drawn_at_position() {
        let mut input = TextInput::from_str("milk");
        input.home();
        assert_eq!(input_text(&input, true, false), "█milk");
    }

    #[test]
    fn task_row_shows_due_date() {
        let task = Task {
            id: 1,
            title: "Buy milk".to_string(),
            is_completed: true,
            due_date: Some("2024-05-01T09:30:00".to_string()),
        };
        let line = task_row(&task, &Palette::for_mode(ThemeMode::Dark), false);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

        assert_eq!(text, "[x] Buy milk  2024-05-01 09:30");
    }
}
