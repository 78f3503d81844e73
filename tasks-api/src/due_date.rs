use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    if let Ok(local_offset) = UtcOffset::current_local_offset() {
        dt.to_offset(local_offset)
    } else {
        dt
    }
}

/// Parse a due date sent by the server into local wall-clock time.
///
/// Accepts RFC 3339 timestamps (converted to the local offset) and naive
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` timestamps, which are taken as local already.
pub fn parse_due_date(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        let local = to_local_time(dt);
        return Some(PrimitiveDateTime::new(local.date(), local.time()));
    }

    let with_seconds = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    if let Ok(dt) = PrimitiveDateTime::parse(raw, with_seconds) {
        return Some(dt);
    }

    let minutes_only = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(raw, minutes_only).ok()
}

/// Format a local due date the way the server stores it: `YYYY-MM-DDTHH:MM:SS`.
pub fn format_due_date(dt: PrimitiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    )
}
