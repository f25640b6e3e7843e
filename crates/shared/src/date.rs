use time::{
    Date, Duration, OffsetDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

const DATE_INPUT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_INPUT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_INPUT_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Current unix timestamp in seconds (UTC).
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// `true` when `format` is a valid `time` format description.
pub fn is_valid_format(format: &str) -> bool {
    time::format_description::parse(format).is_ok()
}

/// Formats a unix timestamp with a `time` format description.
pub fn format_timestamp(timestamp: i64, format: &str) -> crate::Result<String> {
    let items = time::format_description::parse(format)
        .map_err(|e| crate::Error::Server(format!("invalid date format `{format}`: {e}")))?;
    let datetime = OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| crate::Error::Server(format!("invalid timestamp {timestamp}: {e}")))?;

    Ok(datetime.format(&items)?)
}

/// Formats an event date stored as `YYYY-MM-DD`.
///
/// Empty input gives an empty string, unparsable input is returned unchanged.
pub fn format_date(value: &str, format: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    let Ok(date) = Date::parse(value, DATE_INPUT) else {
        return value.to_owned();
    };

    time::format_description::parse(format)
        .ok()
        .and_then(|items| date.format(&items).ok())
        .unwrap_or_else(|| value.to_owned())
}

/// Formats an event time stored as `HH:MM` (or `HH:MM:SS`).
pub fn format_time(value: &str, format: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    let Some(parsed) = parse_time(value) else {
        return value.to_owned();
    };

    time::format_description::parse(format)
        .ok()
        .and_then(|items| parsed.format(&items).ok())
        .unwrap_or_else(|| value.to_owned())
}

pub fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), DATE_INPUT).ok()
}

pub fn parse_time(value: &str) -> Option<Time> {
    let value = value.trim();

    Time::parse(value, TIME_INPUT)
        .or_else(|_| Time::parse(value, TIME_INPUT_SECONDS))
        .ok()
}

/// `YYYY-MM-DD` of today (UTC) shifted by `days`.
pub fn date_in_days(days: i64) -> String {
    let date = OffsetDateTime::now_utc().date() + Duration::days(days);

    date.format(DATE_INPUT).unwrap_or_default()
}
