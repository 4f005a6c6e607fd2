use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Renders "2025-12-07" or "2025-12-07T00:00:00Z" as "07/12/2025".
/// Only the date part is read, so the time zone of the suffix never shifts the day.
pub fn format_date_br(iso_date: &str) -> Option<String> {
    let only_date = iso_date.split('T').next()?.trim();
    let date = NaiveDate::parse_from_str(only_date, "%Y-%m-%d").ok()?;
    Some(format_naive_date_br(date))
}

pub fn format_naive_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// "DD/MM/YYYY, HH:MM:SS" in the given zone.
pub fn format_timestamp_br(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%d/%m/%Y, %H:%M:%S").to_string()
}
