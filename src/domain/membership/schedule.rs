//! Billing schedule arithmetic.
//!
//! Pure functions deriving a membership's end instant and its period
//! schedule from `(valid_from, billing_interval, billing_periods)`.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

use super::{BillingInterval, PeriodState, PlannedPeriod};

/// The end of a billing window lies outside the representable date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{billing_periods} {interval} periods from {valid_from} end outside the supported date range")]
pub struct ScheduleOutOfRange {
    pub valid_from: Timestamp,
    pub interval: BillingInterval,
    pub billing_periods: i32,
}

impl From<ScheduleOutOfRange> for DomainError {
    fn from(err: ScheduleOutOfRange) -> Self {
        DomainError::new(ErrorCode::InvalidStoredValue, err.to_string())
    }
}

/// Advances `valid_from` by `billing_periods` units of `interval`.
///
/// Time of day is kept. A non-positive count leaves the instant unchanged
/// for zero and moves it backwards for negative counts.
///
/// # Errors
///
/// Returns [`ScheduleOutOfRange`] when the end instant cannot be represented.
pub fn compute_valid_until(
    valid_from: Timestamp,
    interval: BillingInterval,
    billing_periods: i32,
) -> Result<Timestamp, ScheduleOutOfRange> {
    interval
        .advance(valid_from, i64::from(billing_periods))
        .ok_or(ScheduleOutOfRange {
            valid_from,
            interval,
            billing_periods,
        })
}

/// Generates the contiguous period schedule of a membership, lazily.
///
/// Boundaries are taken at midnight UTC starting from the date of
/// `valid_from`. Boundary `i` is the anchor date advanced by `i` units, not
/// the previous end advanced by one unit: with month-end clamping a chained
/// schedule anchored on Jan 31 would settle on the 29th for good after
/// February, while anchoring keeps returning to the 31st. Either way the
/// periods tile `[date(valid_from), date(valid_until))` exactly.
///
/// Nothing is allocated up front; periods are produced one at a time. The
/// schedule is empty for a non-positive count and stops early if a boundary
/// is not representable, so callers check [`compute_valid_until`] first.
pub fn generate_periods(
    valid_from: Timestamp,
    interval: BillingInterval,
    billing_periods: i32,
) -> impl Iterator<Item = PlannedPeriod> {
    let anchor = valid_from.start_of_day();

    (1..=i64::from(billing_periods.max(0)))
        .map_while(move |index| interval.advance(anchor, index))
        .scan(anchor, |start, end| {
            let period = PlannedPeriod {
                uuid: Uuid::new_v4(),
                start: *start,
                end,
                state: PeriodState::Planned,
            };
            *start = end;
            Some(period)
        })
}
