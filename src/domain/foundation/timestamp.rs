//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Creates a timestamp at midnight UTC of the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the UTC calendar date of this timestamp.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Returns this timestamp truncated to midnight UTC of the same day.
    pub fn start_of_day(&self) -> Self {
        Self::from_date(self.date())
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Adds whole calendar days. Negative values subtract days.
    ///
    /// Returns `None` when the result falls outside the representable range.
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        let count = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            self.0.checked_add_days(count)
        } else {
            self.0.checked_sub_days(count)
        };
        shifted.map(Self)
    }

    /// Adds calendar months. Negative values subtract months.
    ///
    /// When the day of month does not exist in the target month the result
    /// is normalized to that month's last day (Jan 31 + 1 month = Feb 28/29).
    /// Time of day is preserved. Returns `None` when the result falls outside
    /// the representable range.
    pub fn checked_add_months(&self, months: i64) -> Option<Self> {
        let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let shifted = if months >= 0 {
            self.0.checked_add_months(count)
        } else {
            self.0.checked_sub_months(count)
        };
        shifted.map(Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
