//! Expiry token parsing and expiration time arithmetic.
//!
//! Tokens look like `10m`, `1h`, `7d`, `1M` or `1y`. Minutes, hours and days
//! are fixed durations; months and years follow the calendar, clamping the
//! day to the last valid day of the target month.

use chrono::{DateTime, Months, TimeDelta, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Unit of an expiry token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl ExpiryUnit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'm' => Some(Self::Minutes),
            'h' => Some(Self::Hours),
            'd' => Some(Self::Days),
            'M' => Some(Self::Months),
            'y' => Some(Self::Years),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
            Self::Months => 'M',
            Self::Years => 'y',
        }
    }
}

/// A parsed expiry token: a positive amount of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryToken {
    amount: u32,
    unit: ExpiryUnit,
}

impl ExpiryToken {
    /// Creates a token, rejecting a zero amount.
    pub fn new(amount: u32, unit: ExpiryUnit) -> Result<Self, AppError> {
        if amount == 0 {
            return Err(AppError::InvalidExpiryToken(format!(
                "{amount}{}",
                unit.as_char()
            )));
        }
        Ok(Self { amount, unit })
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn unit(&self) -> ExpiryUnit {
        self.unit
    }

    /// Adds this token to `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidExpiryToken`] if the result falls outside
    /// the representable date range.
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
        let amount = i64::from(self.amount);

        let expires_at = match self.unit {
            ExpiryUnit::Minutes => TimeDelta::try_minutes(amount)
                .and_then(|delta| created_at.checked_add_signed(delta)),
            ExpiryUnit::Hours => TimeDelta::try_hours(amount)
                .and_then(|delta| created_at.checked_add_signed(delta)),
            ExpiryUnit::Days => TimeDelta::try_days(amount)
                .and_then(|delta| created_at.checked_add_signed(delta)),
            ExpiryUnit::Months => created_at.checked_add_months(Months::new(self.amount)),
            ExpiryUnit::Years => self
                .amount
                .checked_mul(12)
                .and_then(|months| created_at.checked_add_months(Months::new(months))),
        };

        expires_at
            .filter(|expires_at| *expires_at > created_at)
            .ok_or_else(|| AppError::InvalidExpiryToken(format!("{self} is out of range")))
    }
}

impl FromStr for ExpiryToken {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidExpiryToken(s.to_string());

        let mut chars = s.chars();
        let unit = chars
            .next_back()
            .and_then(ExpiryUnit::from_char)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let amount: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(amount, unit).map_err(|_| invalid())
    }
}

impl fmt::Display for ExpiryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.as_char())
    }
}

/// Parses `token` and computes the expiration time relative to `created_at`.
///
/// # Errors
///
/// Returns [`AppError::InvalidExpiryToken`] for malformed tokens, unknown
/// units, zero amounts and out-of-range results.
pub fn compute_expiry(created_at: DateTime<Utc>, token: &str) -> Result<DateTime<Utc>, AppError> {
    token.parse::<ExpiryToken>()?.expires_at(created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_all_units() {
        assert_eq!(
            "10m".parse::<ExpiryToken>().unwrap(),
            ExpiryToken::new(10, ExpiryUnit::Minutes).unwrap()
        );
        assert_eq!("1h".parse::<ExpiryToken>().unwrap().unit(), ExpiryUnit::Hours);
        assert_eq!("7d".parse::<ExpiryToken>().unwrap().unit(), ExpiryUnit::Days);
        assert_eq!("1M".parse::<ExpiryToken>().unwrap().unit(), ExpiryUnit::Months);
        assert_eq!("2y".parse::<ExpiryToken>().unwrap().amount(), 2);
    }

    #[test]
    fn test_display_round_trips_token_text() {
        for token in ["10m", "1h", "7d", "1M", "1y"] {
            assert_eq!(token.parse::<ExpiryToken>().unwrap().to_string(), token);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        for token in ["10s", "1w", "1H", "1D", "1Y", "5"] {
            assert!(
                matches!(token.parse::<ExpiryToken>(), Err(AppError::InvalidExpiryToken(_))),
                "token {token} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_amount() {
        for token in ["", "m", "0m", "-1d", "+1d", " 1d", "1.5h", "1dd", "abc"] {
            assert!(
                token.parse::<ExpiryToken>().is_err(),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_amount_overflow() {
        assert!("99999999999d".parse::<ExpiryToken>().is_err());
    }

    #[test]
    fn test_fixed_units() {
        let created = at(2024, 3, 10, 12, 0);

        assert_eq!(compute_expiry(created, "10m").unwrap(), at(2024, 3, 10, 12, 10));
        assert_eq!(compute_expiry(created, "1h").unwrap(), at(2024, 3, 10, 13, 0));
        assert_eq!(compute_expiry(created, "7d").unwrap(), at(2024, 3, 17, 12, 0));
    }

    #[test]
    fn test_month_clamps_to_leap_february() {
        assert_eq!(
            compute_expiry(at(2024, 1, 31, 0, 0), "1M").unwrap(),
            at(2024, 2, 29, 0, 0)
        );
    }

    #[test]
    fn test_month_clamps_to_non_leap_february() {
        assert_eq!(
            compute_expiry(at(2023, 1, 31, 0, 0), "1M").unwrap(),
            at(2023, 2, 28, 0, 0)
        );
    }

    #[test]
    fn test_month_is_not_thirty_days() {
        let created = at(2024, 1, 31, 0, 0);
        assert_ne!(
            compute_expiry(created, "1M").unwrap(),
            compute_expiry(created, "30d").unwrap()
        );
    }

    #[test]
    fn test_year_from_leap_day() {
        assert_eq!(
            compute_expiry(at(2024, 2, 29, 8, 30), "1y").unwrap(),
            at(2025, 2, 28, 8, 30)
        );
        assert_eq!(
            compute_expiry(at(2024, 2, 29, 8, 30), "4y").unwrap(),
            at(2028, 2, 29, 8, 30)
        );
    }

    #[test]
    fn test_months_across_year_boundary() {
        assert_eq!(
            compute_expiry(at(2024, 11, 30, 0, 0), "3M").unwrap(),
            at(2025, 2, 28, 0, 0)
        );
    }

    #[test]
    fn test_result_strictly_after_creation() {
        let created = at(2024, 6, 15, 9, 45);
        for token in ["1m", "1h", "1d", "1M", "1y", "59m", "23h", "365d", "12M", "10y"] {
            assert!(compute_expiry(created, token).unwrap() > created, "{token}");
        }
    }

    #[test]
    fn test_out_of_range_result_is_rejected() {
        let created = at(2024, 1, 1, 0, 0);
        assert!(matches!(
            compute_expiry(created, "4000000000y"),
            Err(AppError::InvalidExpiryToken(_))
        ));
        assert!(matches!(
            compute_expiry(created, "999999999d"),
            Err(AppError::InvalidExpiryToken(_))
        ));
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(ExpiryToken::new(0, ExpiryUnit::Days).is_err());
    }
}
