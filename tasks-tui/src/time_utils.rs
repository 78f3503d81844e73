use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Today's date in local time, falling back to UTC when the offset is unknown.
pub fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

pub fn format_due_label(due: PrimitiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}",
        format_date(due.date()),
        due.hour(),
        due.minute()
    )
}
