//! Billing cadence of a membership.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Cadence unit used to advance dates.
///
/// One unit is seven calendar days, one calendar month, or twelve calendar
/// months respectively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BillingInterval {
    /// All recognized intervals.
    pub const ALL: [BillingInterval; 3] = [
        BillingInterval::Weekly,
        BillingInterval::Monthly,
        BillingInterval::Yearly,
    ];

    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Weekly => "weekly",
            BillingInterval::Monthly => "monthly",
            BillingInterval::Yearly => "yearly",
        }
    }

    /// Advances `from` by `units` billing units using calendar arithmetic.
    ///
    /// Returns `None` when the result is outside the representable range.
    pub fn advance(&self, from: Timestamp, units: i64) -> Option<Timestamp> {
        match self {
            BillingInterval::Weekly => from.checked_add_days(units.checked_mul(7)?),
            BillingInterval::Monthly => from.checked_add_months(units),
            BillingInterval::Yearly => from.checked_add_months(units.checked_mul(12)?),
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BillingInterval::Weekly),
            "monthly" => Ok(BillingInterval::Monthly),
            "yearly" => Ok(BillingInterval::Yearly),
            other => Err(ValidationError::unknown_value("billingInterval", other)),
        }
    }
}

/// Interval as requested by a caller, before validation.
///
/// Creation input is free text; a value outside the recognized set is kept
/// so validation can report it instead of rejecting the input up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedInterval {
    Recognized(BillingInterval),
    Unrecognized(String),
}

impl RequestedInterval {
    /// Classifies a raw interval value.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<BillingInterval>()
            .map(RequestedInterval::Recognized)
            .unwrap_or_else(|_| RequestedInterval::Unrecognized(raw.to_string()))
    }

    /// Returns the interval if it is one of the recognized values.
    pub fn recognized(&self) -> Option<BillingInterval> {
        match self {
            RequestedInterval::Recognized(interval) => Some(*interval),
            RequestedInterval::Unrecognized(_) => None,
        }
    }
}

impl Default for RequestedInterval {
    fn default() -> Self {
        RequestedInterval::Recognized(BillingInterval::default())
    }
}

impl From<BillingInterval> for RequestedInterval {
    fn from(interval: BillingInterval) -> Self {
        RequestedInterval::Recognized(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    }

    #[test]
    fn default_interval_is_monthly() {
        assert_eq!(BillingInterval::default(), BillingInterval::Monthly);
    }

    #[test]
    fn parses_recognized_values() {
        for interval in BillingInterval::ALL {
            assert_eq!(interval.as_str().parse::<BillingInterval>().unwrap(), interval);
        }
    }

    #[test]
    fn rejects_unrecognized_values() {
        assert!("daily".parse::<BillingInterval>().is_err());
        assert!("Monthly".parse::<BillingInterval>().is_err());
    }

    #[test]
    fn requested_interval_keeps_unrecognized_text() {
        assert_eq!(
            RequestedInterval::parse("daily"),
            RequestedInterval::Unrecognized("daily".to_string())
        );
        assert_eq!(
            RequestedInterval::parse("yearly").recognized(),
            Some(BillingInterval::Yearly)
        );
    }

    #[test]
    fn advance_uses_calendar_units() {
        let start = ts(2024, 1, 1);
        assert_eq!(BillingInterval::Weekly.advance(start, 2), Some(ts(2024, 1, 15)));
        assert_eq!(BillingInterval::Monthly.advance(start, 3), Some(ts(2024, 4, 1)));
        assert_eq!(BillingInterval::Yearly.advance(start, 2), Some(ts(2026, 1, 1)));
    }

    #[test]
    fn advance_past_calendar_range_is_none() {
        let start = ts(2024, 1, 1);
        assert_eq!(BillingInterval::Weekly.advance(start, 20_000_000), None);
        assert_eq!(BillingInterval::Yearly.advance(start, i64::from(i32::MIN)), None);
        assert_eq!(BillingInterval::Weekly.advance(start, i64::MAX), None);
    }

    #[test]
    fn interval_serializes_lowercase() {
        let json = serde_json::to_string(&BillingInterval::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
    }
}
