//! Membership repository port.
//!
//! Defines the contract for persisting memberships and their billing
//! periods. Implementations handle the actual storage operations.
//!
//! # Design
//!
//! - **Storage assigns identity**: `id` and `uuid` of a membership, and `id`
//!   of a period, are set by the implementation on insert
//! - **No business rules**: validation and derivation happen before the
//!   port is called; the port stores what it is given
//! - **Cascade**: deleting a membership removes its periods
//!
//! # Example
//!
//! ```ignore
//! async fn store(
//!     repo: &dyn MembershipRepository,
//!     draft: MembershipDraft,
//! ) -> Result<Membership, MembershipError> {
//!     let new_membership = draft.validated()?;
//!     repo.create_membership(&new_membership)
//!         .await
//!         .map_err(MembershipError::creation_failed)
//! }
//! ```

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::{
    Membership, MembershipChanges, MembershipPeriod, NewMembership, NewMembershipPeriod,
};
use async_trait::async_trait;

/// Repository port for membership and period persistence.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// List all memberships, without periods.
    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError>;

    /// Find a membership by its id.
    ///
    /// Returns `None` if not found.
    async fn get_membership(&self, id: MembershipId) -> Result<Option<Membership>, DomainError>;

    /// Insert a membership, assigning `id` and `uuid`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError>;

    /// Apply present fields of `changes` to a stored membership.
    ///
    /// Returns `None` if no membership has this id.
    async fn update_membership(
        &self,
        id: MembershipId,
        changes: &MembershipChanges,
    ) -> Result<Option<Membership>, DomainError>;

    /// Delete a membership and its periods.
    ///
    /// Returns `false` if nothing was deleted.
    async fn delete_membership(&self, id: MembershipId) -> Result<bool, DomainError>;

    /// List the periods of a membership, ordered by start.
    async fn list_periods(
        &self,
        membership_id: MembershipId,
    ) -> Result<Vec<MembershipPeriod>, DomainError>;

    /// Insert a period, assigning its `id`.
    async fn create_period(
        &self,
        period: &NewMembershipPeriod,
    ) -> Result<MembershipPeriod, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn membership_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MembershipRepository) {}
    }
}
