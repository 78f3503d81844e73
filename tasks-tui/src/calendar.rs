use tasks_api::Task;
use thiserror::Error;
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

/// Tasks due on `date` (local calendar day). Unscheduled tasks never match.
pub fn tasks_for_date(tasks: &[Task], date: Date) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.due_at().is_some_and(|due| due.date() == date))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMarker {
    None,
    Pending,
    AllCompleted,
}

pub fn day_marker(tasks: &[Task], date: Date) -> DayMarker {
    let due = tasks_for_date(tasks, date);
    if due.is_empty() {
        DayMarker::None
    } else if due.iter().all(|task| task.is_completed) {
        DayMarker::AllCompleted
    } else {
        DayMarker::Pending
    }
}

/// Marker for every day of the month containing `date` that has tasks.
pub fn month_markers(tasks: &[Task], date: Date) -> Vec<(Date, DayMarker)> {
    let Ok(mut day) = date.replace_day(1) else {
        return Vec::new();
    };

    let mut markers = Vec::new();
    while day.month() == date.month() {
        let marker = day_marker(tasks, day);
        if marker != DayMarker::None {
            markers.push((day, marker));
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    markers
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeOfDayError {
    #[error("Time must look like HH:MM")]
    Format,
    #[error("Time {0} is out of range")]
    OutOfRange(String),
}

/// Parse an `HH:MM` time of day (single-digit hours allowed).
pub fn parse_time_of_day(input: &str) -> Result<Time, TimeOfDayError> {
    let input = input.trim();
    let (hours, minutes) = input.split_once(':').ok_or(TimeOfDayError::Format)?;

    let is_number = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !is_number(hours) || minutes.len() != 2 || !is_number(minutes) {
        return Err(TimeOfDayError::Format);
    }

    let hours: u8 = hours.parse().map_err(|_| TimeOfDayError::Format)?;
    let minutes: u8 = minutes.parse().map_err(|_| TimeOfDayError::Format)?;
    Time::from_hms(hours, minutes, 0).map_err(|_| TimeOfDayError::OutOfRange(input.to_string()))
}

/// The selected calendar day with its hour and minute replaced by `time_of_day`.
pub fn combine_date_and_time(date: Date, time_of_day: Time) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time_of_day)
}

pub fn shift_days(date: Date, days: i64) -> Date {
    date.checked_add(Duration::days(days)).unwrap_or(date)
}

/// Move by whole months, clamping the day to the length of the target month.
pub fn shift_months(date: Date, months: i32) -> Date {
    let zero_based = date.month() as i32 - 1 + months;
    let year = date.year() + zero_based.div_euclid(12);
    let Ok(month) = Month::try_from((zero_based.rem_euclid(12) + 1) as u8) else {
        return date;
    };

    let day = date.day().min(days_in_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

fn days_in_month(year: i32, month: Month) -> u8 {
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        other => (year, other.next()),
    };
    Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(|first| first.previous_day())
        .map(|last| last.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    fn task(id: i64, due_date: Option<&str>, is_completed: bool) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            is_completed,
            due_date: due_date.map(str::to_string),
        }
    }

    #[test]
    fn selects_only_tasks_on_the_given_day() {
        let tasks = vec![
            task(1, Some("2024-05-01T09:00:00"), false),
            task(2, Some("2024-05-02T09:00:00"), false),
        ];

        let due: Vec<i64> = tasks_for_date(&tasks, date!(2024 - 05 - 01))
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(due, vec![1]);
    }

    #[test]
    fn every_scheduled_task_is_found_on_its_own_day() {
        let tasks = vec![
            task(1, Some("2024-05-01T00:00:00"), false),
            task(2, Some("2024-05-01T23:59:59"), true),
            task(3, Some("2024-02-29T12:00"), false),
            task(4, Some("2023-12-31T18:45:00.5"), false),
        ];

        for t in &tasks {
            let day = t.due_at().unwrap().date();
            assert!(tasks_for_date(&tasks, day).iter().any(|d| d.id == t.id));
        }
    }

    #[test]
    fn unscheduled_tasks_match_no_day() {
        let tasks = vec![task(1, None, false), task(2, Some("soon"), false)];

        for day in [date!(2024 - 05 - 01), date!(1970 - 01 - 01), date!(2099 - 12 - 31)] {
            assert!(tasks_for_date(&tasks, day).is_empty());
        }
    }

    #[test]
    fn marker_reflects_completion() {
        let tasks = vec![
            task(1, Some("2024-05-01T09:00:00"), true),
            task(2, Some("2024-05-01T10:00:00"), true),
            task(3, Some("2024-05-02T09:00:00"), true),
            task(4, Some("2024-05-02T11:00:00"), false),
        ];

        assert_eq!(day_marker(&tasks, date!(2024 - 05 - 01)), DayMarker::AllCompleted);
        assert_eq!(day_marker(&tasks, date!(2024 - 05 - 02)), DayMarker::Pending);
        assert_eq!(day_marker(&tasks, date!(2024 - 05 - 03)), DayMarker::None);
    }

    #[test]
    fn month_markers_stay_inside_the_month() {
        let tasks = vec![
            task(1, Some("2024-04-30T09:00:00"), false),
            task(2, Some("2024-05-01T09:00:00"), true),
            task(3, Some("2024-05-31T09:00:00"), false),
            task(4, Some("2024-06-01T09:00:00"), false),
        ];

        assert_eq!(
            month_markers(&tasks, date!(2024 - 05 - 17)),
            vec![
                (date!(2024 - 05 - 01), DayMarker::AllCompleted),
                (date!(2024 - 05 - 31), DayMarker::Pending),
            ]
        );
    }

    #[test]
    fn combines_selected_date_with_entered_time() {
        let time_of_day = parse_time_of_day("09:30").unwrap();

        assert_eq!(
            combine_date_and_time(date!(2024 - 05 - 01), time_of_day),
            datetime!(2024-05-01 09:30:00)
        );
    }

    #[test]
    fn parses_times_of_day() {
        assert_eq!(parse_time_of_day("9:05"), Ok(time!(09:05)));
        assert_eq!(parse_time_of_day(" 23:59 "), Ok(time!(23:59)));
        assert_eq!(parse_time_of_day("00:00"), Ok(time!(00:00)));
    }

    #[test]
    fn rejects_bad_times_of_day() {
        assert_eq!(parse_time_of_day("0930"), Err(TimeOfDayError::Format));
        assert_eq!(parse_time_of_day("9:5"), Err(TimeOfDayError::Format));
        assert_eq!(parse_time_of_day("ab:cd"), Err(TimeOfDayError::Format));
        assert_eq!(parse_time_of_day("-1:00"), Err(TimeOfDayError::Format));
        assert_eq!(
            parse_time_of_day("24:00"),
            Err(TimeOfDayError::OutOfRange("24:00".to_string()))
        );
        assert_eq!(
            parse_time_of_day("12:60"),
            Err(TimeOfDayError::OutOfRange("12:60".to_string()))
        );
    }

    #[test]
    fn shifts_days_across_month_boundaries() {
        assert_eq!(shift_days(date!(2024 - 05 - 31), 1), date!(2024 - 06 - 01));
        assert_eq!(shift_days(date!(2024 - 03 - 01), -1), date!(2024 - 02 - 29));
        assert_eq!(shift_days(date!(2024 - 05 - 01), 7), date!(2024 - 05 - 08));
    }

    #[test]
    fn shifts_months_and_clamps_day() {
        assert_eq!(shift_months(date!(2024 - 01 - 31), 1), date!(2024 - 02 - 29));
        assert_eq!(shift_months(date!(2023 - 01 - 31), 1), date!(2023 - 02 - 28));
        assert_eq!(shift_months(date!(2024 - 12 - 15), 1), date!(2025 - 01 - 15));
        assert_eq!(shift_months(date!(2024 - 01 - 15), -1), date!(2023 - 12 - 15));
        assert_eq!(shift_months(date!(2024 - 05 - 31), -13), date!(2023 - 04 - 30));
    }
}
