//! Membership-specific error types.
//!
//! Every failure the membership service reports to callers is one of these
//! kinds. Persistence failures are attached as the `cause`.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | NotFound | 404 |
//! | CreationFailed | 400 |
//! | UpdateFailed | 400 |
//! | DeleteFailed | 400 |
//! | FetchFailed | 500 |
//! | PeriodCreationFailed | 500 |
//! | PeriodFetchFailed | 500 |

use thiserror::Error;

use crate::domain::foundation::{DomainError, MembershipId};

use super::ValidationCode;

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// Input violated a validation rule.
    #[error("{0}")]
    ValidationFailed(ValidationCode),

    /// No membership with this id exists.
    #[error("Membership not found")]
    NotFound(MembershipId),

    /// Listing or loading memberships failed.
    #[error("Failed to fetch memberships with periods")]
    FetchFailed {
        #[source]
        cause: DomainError,
    },

    /// Storing a new membership failed.
    #[error("Failed to create membership")]
    CreationFailed {
        #[source]
        cause: DomainError,
    },

    /// Updating a membership failed. The existence check may fail before
    /// storage is touched, in which case there is no cause.
    #[error("Failed to update membership")]
    UpdateFailed {
        #[source]
        cause: Option<DomainError>,
    },

    /// Deleting a membership failed.
    #[error("Failed to delete membership")]
    DeleteFailed {
        #[source]
        cause: DomainError,
    },

    /// Storing a generated period failed.
    #[error("Failed to create membership period")]
    PeriodCreationFailed {
        #[source]
        cause: DomainError,
    },

    /// Loading the periods of a membership failed.
    #[error("Failed to fetch membership periods")]
    PeriodFetchFailed {
        #[source]
        cause: DomainError,
    },
}

impl MembershipError {
    pub fn not_found(id: MembershipId) -> Self {
        MembershipError::NotFound(id)
    }

    pub fn fetch_failed(cause: DomainError) -> Self {
        MembershipError::FetchFailed { cause }
    }

    pub fn creation_failed(cause: DomainError) -> Self {
        MembershipError::CreationFailed { cause }
    }

    pub fn update_failed(cause: DomainError) -> Self {
        MembershipError::UpdateFailed { cause: Some(cause) }
    }

    pub fn delete_failed(cause: DomainError) -> Self {
        MembershipError::DeleteFailed { cause }
    }

    pub fn period_creation_failed(cause: DomainError) -> Self {
        MembershipError::PeriodCreationFailed { cause }
    }

    pub fn period_fetch_failed(cause: DomainError) -> Self {
        MembershipError::PeriodFetchFailed { cause }
    }

    /// Returns the stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            MembershipError::ValidationFailed(_) => "VALIDATION_FAILED",
            MembershipError::NotFound(_) => "MEMBERSHIP_NOT_FOUND",
            MembershipError::FetchFailed { .. } => "MEMBERSHIP_FETCH_FAILED",
            MembershipError::CreationFailed { .. } => "MEMBERSHIP_CREATION_FAILED",
            MembershipError::UpdateFailed { .. } => "MEMBERSHIP_UPDATE_FAILED",
            MembershipError::DeleteFailed { .. } => "MEMBERSHIP_DELETE_FAILED",
            MembershipError::PeriodCreationFailed { .. } => "MEMBERSHIP_PERIOD_CREATION_FAILED",
            MembershipError::PeriodFetchFailed { .. } => "MEMBERSHIP_PERIOD_FETCH_FAILED",
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the underlying persistence failure, if any.
    pub fn cause(&self) -> Option<&DomainError> {
        match self {
            MembershipError::ValidationFailed(_)
            | MembershipError::NotFound(_)
            | MembershipError::UpdateFailed { cause: None } => None,
            MembershipError::FetchFailed { cause }
            | MembershipError::CreationFailed { cause }
            | MembershipError::UpdateFailed { cause: Some(cause) }
            | MembershipError::DeleteFailed { cause }
            | MembershipError::PeriodCreationFailed { cause }
            | MembershipError::PeriodFetchFailed { cause } => Some(cause),
        }
    }
}

impl From<ValidationCode> for MembershipError {
    fn from(code: ValidationCode) -> Self {
        MembershipError::ValidationFailed(code)
    }
}
