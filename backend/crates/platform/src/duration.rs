//! Human-readable duration parsing
//!
//! Accepts the compact forms used in configuration: `"30s"`, `"15m"`,
//! `"12h"`, `"1d"`, `"2w"`, long unit names (`"2 days"`) and bare
//! integers, which are read as seconds.

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("Duration is empty")]
    Empty,

    #[error("Invalid duration amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown duration unit: {0}")]
    UnknownUnit(String),

    #[error("Duration must be positive")]
    NotPositive,

    #[error("Duration is too large")]
    Overflow,
}

/// Parse a duration such as `"1d"` or `"90 minutes"`
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (amount, unit) = trimmed.split_at(split);

    let amount: i64 = amount
        .parse()
        .map_err(|_| DurationParseError::InvalidAmount(trimmed.to_string()))?;
    if amount <= 0 {
        return Err(DurationParseError::NotPositive);
    }

    let unit_secs: i64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        other => return Err(DurationParseError::UnknownUnit(other.to_string())),
    };

    let secs = amount
        .checked_mul(unit_secs)
        .ok_or(DurationParseError::Overflow)?;
    Duration::try_seconds(secs).ok_or(DurationParseError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_units() {
        assert_eq!(parse_duration("30s"), Ok(Duration::seconds(30)));
        assert_eq!(parse_duration("15m"), Ok(Duration::minutes(15)));
        assert_eq!(parse_duration("12h"), Ok(Duration::hours(12)));
        assert_eq!(parse_duration("1d"), Ok(Duration::days(1)));
        assert_eq!(parse_duration("2w"), Ok(Duration::weeks(2)));
    }

    #[test]
    fn test_long_units_and_bare_seconds() {
        assert_eq!(parse_duration("2 days"), Ok(Duration::days(2)));
        assert_eq!(parse_duration(" 90 Minutes "), Ok(Duration::minutes(90)));
        assert_eq!(parse_duration("3600"), Ok(Duration::hours(1)));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
        assert_eq!(parse_duration("0d"), Err(DurationParseError::NotPositive));
        assert!(matches!(
            parse_duration("1y"),
            Err(DurationParseError::UnknownUnit(_))
        ));
        assert!(matches!(
            parse_duration("d"),
            Err(DurationParseError::InvalidAmount(_))
        ));
        assert_eq!(
            parse_duration("99999999999999999w"),
            Err(DurationParseError::Overflow)
        );
    }
}
