//! Strongly-typed identifier value objects.
//!
//! Memberships and periods are keyed by a storage-assigned serial id. The
//! globally unique `uuid` of each record travels next to it as a plain
//! [`Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Surrogate identifier of a membership, assigned by storage on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i32);

impl MembershipId {
    /// Wraps a raw storage id.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw storage id.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MembershipId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ValidationError::invalid_format("id", "must be an integer"))
    }
}

/// Surrogate identifier of a membership period, assigned by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipPeriodId(i32);

impl MembershipPeriodId {
    /// Wraps a raw storage id.
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw storage id.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MembershipPeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
