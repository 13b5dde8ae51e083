//! Membership and period states.
//!
//! A membership's state is never stored as a source of truth. It is derived
//! from its validity window and the instant of evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Lifecycle state of a membership relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    /// Validity window has not started yet.
    Pending,
    /// Now lies inside the validity window.
    Active,
    /// Validity window has ended.
    Expired,
}

impl MembershipState {
    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipState::Pending => "pending",
            MembershipState::Active => "active",
            MembershipState::Expired => "expired",
        }
    }
}

impl fmt::Display for MembershipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MembershipState::Pending),
            "active" => Ok(MembershipState::Active),
            "expired" => Ok(MembershipState::Expired),
            other => Err(ValidationError::unknown_value("state", other)),
        }
    }
}

/// Derives the state of a validity window at instant `now`.
///
/// A window starting in the future is pending; otherwise a window that ended
/// before `now` is expired; everything else is active. Both bounds are
/// inclusive for the active case.
pub fn compute_state(valid_from: Timestamp, valid_until: Timestamp, now: Timestamp) -> MembershipState {
    if valid_from.is_after(&now) {
        MembershipState::Pending
    } else if valid_until.is_before(&now) {
        MembershipState::Expired
    } else {
        MembershipState::Active
    }
}

/// Known states of a billing period.
///
/// Stored period state is free text; these are the values this service
/// writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodState {
    Planned,
    Active,
    Completed,
}

impl PeriodState {
    /// Returns the wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodState::Planned => "planned",
            PeriodState::Active => "active",
            PeriodState::Completed => "completed",
        }
    }
}

impl fmt::Display for PeriodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
