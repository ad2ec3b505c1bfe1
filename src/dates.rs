use time::{macros::format_description, Date, OffsetDateTime};

use crate::error::ApiError;

/// Wire format for calendar dates, e.g. "2026-08-25".
pub const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn parse_date(s: &str) -> Result<Date, ApiError> {
    Date::parse(s, DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{s}', expected YYYY-MM-DD")))
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parse_and_format_round_trip() {
        let parsed = parse_date("2026-08-25").expect("valid date");
        assert_eq!(parsed, date!(2026 - 08 - 25));
        assert_eq!(format_date(parsed), "2026-08-25");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date("25/08/2026").is_err());
        assert!(parse_date("").is_err());
    }
}
