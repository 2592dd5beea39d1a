use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{WidgetError, WidgetResult};

// Same range the browser Date object accepts: ±100,000,000 days around the epoch.
const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y, %I:%M:%S %p",
];

const LOCAL_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInputKind {
    Timestamp,
    TimestampMillis,
    DateTime,
    Iso,
}

impl DateInputKind {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "timestamp" | "unix" | "seconds" => Ok(Self::Timestamp),
            "timestamp_ms" | "milliseconds" => Ok(Self::TimestampMillis),
            "datetime" => Ok(Self::DateTime),
            "iso" | "iso8601" => Ok(Self::Iso),
            other => Err(WidgetError::unsupported("date input type", other)),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DateField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Parses `input` according to `kind`. `offset_at` maps an epoch instant in
/// milliseconds to the caller's offset east of UTC in minutes at that instant;
/// it applies to date-times written without a zone.
pub fn parse_date_input<F: Fn(i64) -> i32>(
    kind: DateInputKind,
    input: &str,
    offset_at: &F,
) -> WidgetResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(WidgetError::EmptyInput("date/time"));
    }
    match kind {
        DateInputKind::Timestamp => {
            let seconds = parse_leading_integer(trimmed)?;
            from_millis(seconds.checked_mul(1000))
        }
        DateInputKind::TimestampMillis => from_millis(Some(parse_leading_integer(trimmed)?)),
        DateInputKind::DateTime | DateInputKind::Iso => parse_date_text(trimmed, offset_at),
    }
}

fn fixed_offset(offset_minutes: i32) -> WidgetResult<FixedOffset> {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| WidgetError::invalid("timezone offset", format!("{offset_minutes} minutes")))
}

fn from_millis(millis: Option<i64>) -> WidgetResult<DateTime<Utc>> {
    millis
        .filter(|ms| ms.abs() <= MAX_EPOCH_MILLIS)
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| WidgetError::invalid("timestamp", "out of range"))
}

/// Integer prefix of `input` (`"1699123456.9"` reads as `1699123456`).
fn parse_leading_integer(input: &str) -> WidgetResult<i64> {
    let (sign, rest) = match input.as_bytes().first() {
        Some(b'-') => (-1, &input[1..]),
        Some(b'+') => (1, &input[1..]),
        _ => (1, input),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(WidgetError::invalid("timestamp", input));
    }
    digits
        .parse::<i64>()
        .map(|value| value * sign)
        .map_err(|_| WidgetError::invalid("timestamp", "out of range"))
}

fn parse_date_text<F: Fn(i64) -> i32>(input: &str, offset_at: &F) -> WidgetResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(naive) = input
        .strip_suffix(" GMT")
        .and_then(|rest| NaiveDateTime::parse_from_str(rest, "%a, %d %b %Y %H:%M:%S").ok())
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    // Date-only ISO strings are UTC midnight; every other zone-less form is local.
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| WidgetError::invalid("date", input));
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            LOCAL_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| WidgetError::invalid("date/time format", input))?;
    resolve_local(&naive, offset_at)
}

/// Wall-clock time to an instant. The offset is first guessed at the wall
/// reading taken as UTC, then re-checked at the instant that guess produced,
/// which settles readings near a daylight-saving change.
fn resolve_local<F: Fn(i64) -> i32>(
    naive: &NaiveDateTime,
    offset_at: &F,
) -> WidgetResult<DateTime<Utc>> {
    let at_offset = |minutes: i32| -> WidgetResult<DateTime<Utc>> {
        fixed_offset(minutes)?
            .from_local_datetime(naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| WidgetError::invalid("date/time", naive.to_string()))
    };
    let guess = offset_at(naive.and_utc().timestamp_millis());
    let first = at_offset(guess)?;
    let settled = offset_at(first.timestamp_millis());
    if settled == guess {
        Ok(first)
    } else {
        at_offset(settled)
    }
}

/// Renders every representation the converter shows, in display order.
/// Local fields use the offset in force at `instant`, not the current one.
pub fn date_fields<F: Fn(i64) -> i32>(
    instant: DateTime<Utc>,
    offset_at: &F,
) -> WidgetResult<Vec<DateField>> {
    let millis = instant.timestamp_millis();
    let local = instant.with_timezone(&fixed_offset(offset_at(millis))?);
    let fields = vec![
        DateField {
            key: "unix_seconds",
            label: "Unix Timestamp (seconds)",
            value: millis.div_euclid(1000).to_string(),
        },
        DateField {
            key: "unix_milliseconds",
            label: "Unix Timestamp (milliseconds)",
            value: millis.to_string(),
        },
        DateField {
            key: "iso8601",
            label: "ISO 8601",
            value: instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        },
        DateField {
            key: "local",
            label: "Local String",
            value: local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        },
        DateField {
            key: "utc",
            label: "UTC String",
            value: instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        },
        DateField {
            key: "date",
            label: "Date Only",
            value: local.format("%-m/%-d/%Y").to_string(),
        },
        DateField {
            key: "time",
            label: "Time Only",
            value: local.format("%-I:%M:%S %p").to_string(),
        },
    ];
    Ok(fields)
}

pub fn convert_datetime_internal(
    kind: &str,
    input: &str,
    offset_at: impl Fn(i64) -> i32,
) -> WidgetResult<Vec<DateField>> {
    let kind = DateInputKind::parse(kind)?;
    let instant = parse_date_input(kind, input, &offset_at)?;
    log::debug!("datetime {kind:?} {input:?} -> {instant}");
    date_fields(instant, &offset_at)
}

pub fn datetime_now_internal(
    now_millis: i64,
    offset_at: impl Fn(i64) -> i32,
) -> WidgetResult<Vec<DateField>> {
    date_fields(from_millis(Some(now_millis))?, &offset_at)
}
