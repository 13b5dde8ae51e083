//! Membership handlers.
//!
//! Command and query handlers sequencing the membership domain model with
//! the persistence port:
//!
//! ## Commands
//! - Creating a membership together with its billing periods
//! - Partially updating a membership
//! - Deleting a membership
//!
//! ## Queries
//! - Listing memberships with their periods
//! - Getting one membership with its periods
//! - Listing the periods of one membership

mod create_membership;
mod delete_membership;
mod get_membership;
mod list_memberships;
mod list_periods;
mod update_membership;

#[cfg(test)]
mod mock_repository;

// Commands
pub use create_membership::{
    CreateMembershipCommand, CreateMembershipHandler, CreateMembershipResult,
};
pub use delete_membership::{
    DeleteMembershipCommand, DeleteMembershipHandler, DeleteMembershipResult,
};
pub use update_membership::{
    UpdateMembershipCommand, UpdateMembershipHandler, UpdateMembershipResult,
};

// Queries
pub use get_membership::{GetMembershipHandler, GetMembershipQuery, GetMembershipResult};
pub use list_memberships::{ListMembershipsHandler, ListMembershipsQuery, ListMembershipsResult};
pub use list_periods::{ListPeriodsHandler, ListPeriodsQuery, ListPeriodsResult};
