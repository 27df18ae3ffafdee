//! Target date determination in the configured timezone

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::error::AppError;

/// Which calendar day a report is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayChoice {
    Today,
    Tomorrow,
}

/// Parses an IANA timezone identifier such as `Asia/Makassar`.
pub fn parse_timezone(name: &str) -> Result<Tz, AppError> {
    name.parse::<Tz>()
        .map_err(|_| AppError::config_error(format!("Unknown timezone '{name}'")))
}

/// Determines the date to fetch for `day`, as seen on the wall clock in `tz`.
pub fn determine_target_date(day: DayChoice, tz: Tz) -> NaiveDate {
    resolve_target_date(day, tz, Utc::now())
}

/// Same as [`determine_target_date`] with an injected current time, for
/// deterministic tests.
pub fn resolve_target_date(day: DayChoice, tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    let today = now.with_timezone(&tz).date_naive();
    let date = match day {
        DayChoice::Today => today,
        // Dates near chrono's upper bound have no successor; keep today then
        DayChoice::Tomorrow => today.succ_opt().unwrap_or(today),
    };
    info!("Resolved {:?} in {} to {}", day, tz, date);
    date
}

/// Parses an explicit `YYYY-MM-DD` date argument.
pub fn parse_date_arg(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::datetime_parse_error(format!(
            "Invalid date '{input}': {e}. Expected format YYYY-MM-DD"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_uses_configured_timezone() {
        // 17:30 UTC is already the next day in Makassar (UTC+8)
        let now = Utc.with_ymd_and_hms(2024, 4, 30, 17, 30, 0).unwrap();
        let makassar = parse_timezone("Asia/Makassar").unwrap();

        assert_eq!(
            resolve_target_date(DayChoice::Today, makassar, now),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(
            resolve_target_date(DayChoice::Today, chrono_tz::UTC, now),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
        );
    }

    #[test]
    fn test_tomorrow_crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 6, 0, 0).unwrap();
        assert_eq!(
            resolve_target_date(DayChoice::Tomorrow, chrono_tz::Europe::London, now),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert!(matches!(
            parse_date_arg("01-05-2024"),
            Err(AppError::DateTimeParse(_))
        ));
        assert!(parse_date_arg("2024-02-30").is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Asia/Makassar").is_ok());
        assert!(matches!(parse_timezone("Mars/Olympus"), Err(AppError::Config(_))));
    }
}
